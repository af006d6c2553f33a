//! MDCT command.

use super::common::{Labeled, OutputArgs, emit, load_audio};
use clap::Args;
use std::path::PathBuf;
use timbre_analysis::{Mdct, is_princen_bradley};
use timbre_config::AnalysisConfig;

#[derive(Args)]
pub struct MdctArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Window length, overriding the profile
    #[arg(long)]
    window_length: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run(args: MdctArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_audio(&args.input)?;

    let mut settings = config.mdct.clone();
    if let Some(length) = args.window_length {
        settings.window_length = length;
    }
    let window = settings.coefficients();
    tracing::info!(window_length = window.len(), window = ?settings.window, "mdct");
    if !is_princen_bradley(&window, 1e-9) {
        tracing::warn!("window does not satisfy Princen-Bradley; IMDCT will not reconstruct");
    }

    let transform = Mdct::new(&window)?;
    let coefficients = transform.forward(&samples);

    // Bin k is centred on (k + 1/2)·sr/L.
    let frequencies: Vec<f64> = (0..coefficients.nrows())
        .map(|k| (k as f64 + 0.5) * sample_rate / window.len() as f64)
        .collect();

    emit(
        &Labeled {
            kind: "mdct",
            matrix: &coefficients,
            rows: &frequencies,
            num_samples: samples.len(),
            sample_rate,
        },
        &args.output,
    )
}
