//! Mel spectrogram and MFCC commands.

use super::common::{Labeled, OutputArgs, emit, load_audio};
use clap::Args;
use std::path::PathBuf;
use timbre_analysis::{MelFilterBank, melspectrogram, mfcc};
use timbre_config::AnalysisConfig;

#[derive(Args)]
pub struct MelArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Number of mel filters, overriding the profile
    #[arg(long)]
    filters: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
pub struct MfccArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Number of mel filters, overriding the profile
    #[arg(long)]
    filters: Option<usize>,

    /// Number of coefficients, overriding the profile
    #[arg(short = 'n', long)]
    coefficients: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run_mel(args: MelArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_audio(&args.input)?;
    let window = config.stft.coefficients(sample_rate)?;
    let step = config.stft.step_length(sample_rate);
    let num_filters = args.filters.unwrap_or(config.mel.filters);
    tracing::info!(window_length = window.len(), step, num_filters, "mel spectrogram");

    let filterbank = MelFilterBank::build(sample_rate, window.len(), num_filters)?;
    let spectrogram = melspectrogram(&samples, &window, step, &filterbank)?;

    emit(
        &Labeled {
            kind: "mel",
            matrix: &spectrogram,
            rows: filterbank.center_frequencies(),
            num_samples: samples.len(),
            sample_rate,
        },
        &args.output,
    )
}

pub fn run_mfcc(args: MfccArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_audio(&args.input)?;
    let window = config.stft.coefficients(sample_rate)?;
    let step = config.stft.step_length(sample_rate);
    let num_filters = args.filters.unwrap_or(config.mel.filters);
    let num_coefficients = args.coefficients.unwrap_or(config.mel.coefficients);
    tracing::info!(
        window_length = window.len(),
        step,
        num_filters,
        num_coefficients,
        "mfcc"
    );

    let filterbank = MelFilterBank::build(sample_rate, window.len(), num_filters)?;
    let coefficients = mfcc(&samples, &window, step, &filterbank, num_coefficients)?;

    if coefficients.ncols() > 0 {
        let means: Vec<String> = coefficients
            .rows()
            .into_iter()
            .map(|row| format!("{:.2}", row.mean().unwrap_or(0.0)))
            .collect();
        println!("Mean coefficients: [{}]", means.join(", "));
    }

    let indices: Vec<f64> = (1..=coefficients.nrows()).map(|k| k as f64).collect();
    emit(
        &Labeled {
            kind: "mfcc",
            matrix: &coefficients,
            rows: &indices,
            num_samples: samples.len(),
            sample_rate,
        },
        &args.output,
    )
}
