//! Analysis-synthesis round trip.

use super::common::{load_audio, max_abs_error};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use timbre_analysis::{imdct, istft, mdct, stft};
use timbre_config::AnalysisConfig;
use timbre_io::{WavSpec, write_wav};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    /// STFT then ISTFT with the profile's window
    Stft,
    /// MDCT then IMDCT with the profile's Princen-Bradley window
    Mdct,
}

#[derive(Args)]
pub struct ResynthArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Transform pair to round-trip through
    #[arg(long, value_enum, default_value = "stft")]
    method: Method,

    /// Write the resynthesized signal here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output bit depth (32 = float)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ResynthArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_audio(&args.input)?;

    let mut resynthesized = match args.method {
        Method::Stft => {
            let window = config.stft.coefficients(sample_rate)?;
            let step = config.stft.step_length(sample_rate);
            tracing::info!(window_length = window.len(), step, "stft round trip");
            let spectrogram = stft(&samples, &window, step)?;
            istft(&spectrogram, &window, step)?
        }
        Method::Mdct => {
            let window = config.mdct.coefficients();
            tracing::info!(
                window_length = window.len(),
                window = ?config.mdct.window,
                "mdct round trip"
            );
            let coefficients = mdct(&samples, &window)?;
            imdct(&coefficients, &window)?
        }
    };

    let error = max_abs_error(&samples, &resynthesized);
    println!("Round trip ({:?}): max error {error:.3e}", args.method);
    if resynthesized.len() < samples.len() {
        println!(
            "  {} trailing samples not reconstructed",
            samples.len() - resynthesized.len()
        );
    }

    if let Some(path) = args.output {
        resynthesized.resize(samples.len(), 0.0);
        let spec = WavSpec {
            channels: 1,
            sample_rate: sample_rate as u32,
            bits_per_sample: args.bit_depth,
        };
        write_wav(&path, &resynthesized, spec)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
