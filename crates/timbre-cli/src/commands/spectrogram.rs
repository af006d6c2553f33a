//! Magnitude STFT spectrogram.

use super::common::{Labeled, OutputArgs, emit, load_audio, loudest_row};
use clap::Args;
use std::path::PathBuf;
use timbre_analysis::export::bin_frequencies;
use timbre_analysis::matrix::magnitude_rows;
use timbre_analysis::{Window, stft};
use timbre_config::AnalysisConfig;

#[derive(Args)]
pub struct SpectrogramArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Window function, overriding the profile
    #[arg(long)]
    window: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run(args: SpectrogramArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_audio(&args.input)?;

    let window_type = match &args.window {
        Some(name) => name.parse::<Window>().map_err(anyhow::Error::msg)?,
        None => config.stft.window()?,
    };
    let window_length = config.stft.window_length(sample_rate);
    let step = config.stft.step_length(sample_rate);
    tracing::info!(window = window_type.name(), window_length, step, "stft");

    let window = window_type.coefficients(window_length);
    let spectrogram = stft(&samples, &window, step)?;
    let magnitude = magnitude_rows(spectrogram.view(), 0..window_length / 2 + 1);
    let frequencies = bin_frequencies(0, magnitude.nrows(), window_length, sample_rate);

    if let Some(bin) = loudest_row(&magnitude) {
        println!("Strongest bin: {:.1} Hz", frequencies[bin]);
    }

    emit(
        &Labeled {
            kind: "spectrogram",
            matrix: &magnitude,
            rows: &frequencies,
            num_samples: samples.len(),
            sample_rate,
        },
        &args.output,
    )
}
