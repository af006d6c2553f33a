//! Timbre CLI - time-frequency analysis of WAV files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timbre")]
#[command(author, version, about = "Time-frequency audio analysis", long_about = None)]
struct Cli {
    /// Analysis profile: a built-in name, a saved profile name, or a TOML path
    #[arg(short, long, global = true, value_name = "PROFILE")]
    config: Option<String>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show WAV metadata and the analysis layout it would get
    Info(commands::info::InfoArgs),

    /// Magnitude STFT spectrogram
    Spectrogram(commands::spectrogram::SpectrogramArgs),

    /// Analyze and resynthesize a file, reporting the reconstruction error
    Resynth(commands::resynth::ResynthArgs),

    /// Mel spectrogram
    Mel(commands::mel::MelArgs),

    /// Mel-frequency cepstral coefficients
    Mfcc(commands::mel::MfccArgs),

    /// Constant-Q spectrogram
    Cqt(commands::cqt::CqtArgs),

    /// Constant-Q chromagram
    Chroma(commands::cqt::ChromaArgs),

    /// Modified discrete cosine transform
    Mdct(commands::mdct::MdctArgs),

    /// Discrete cosine or sine transform of a list of values
    Dct(commands::dct::DctArgs),

    /// List, show and save analysis profiles
    Profiles(commands::profiles::ProfilesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::common::load_config(cli.config.as_deref())?;
    tracing::debug!(profile = %config.name, "analysis profile");

    match cli.command {
        Commands::Info(args) => commands::info::run(args, &config),
        Commands::Spectrogram(args) => commands::spectrogram::run(args, &config),
        Commands::Resynth(args) => commands::resynth::run(args, &config),
        Commands::Mel(args) => commands::mel::run_mel(args, &config),
        Commands::Mfcc(args) => commands::mel::run_mfcc(args, &config),
        Commands::Cqt(args) => commands::cqt::run_cqt(args, &config),
        Commands::Chroma(args) => commands::cqt::run_chroma(args, &config),
        Commands::Mdct(args) => commands::mdct::run(args, &config),
        Commands::Dct(args) => commands::dct::run(args),
        Commands::Profiles(args) => commands::profiles::run(args, &config),
    }
}
