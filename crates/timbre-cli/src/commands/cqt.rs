//! Constant-Q spectrogram and chromagram commands.

use super::common::{Labeled, OutputArgs, emit, load_audio, loudest_row};
use clap::Args;
use std::path::PathBuf;
use timbre_analysis::{CqtKernel, cqt_spectrogram, fold_chroma};
use timbre_config::AnalysisConfig;

#[derive(Args)]
pub struct CqtArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Channels per octave, overriding the profile
    #[arg(long)]
    resolution: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
pub struct ChromaArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Channels per octave, overriding the profile
    #[arg(long)]
    resolution: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

fn build_kernel(
    config: &AnalysisConfig,
    sample_rate: f64,
    resolution: Option<usize>,
) -> anyhow::Result<CqtKernel> {
    let cqt = &config.cqt;
    let octave_resolution = resolution.unwrap_or(cqt.octave_resolution);
    tracing::info!(
        octave_resolution,
        min_frequency = cqt.min_frequency,
        max_frequency = cqt.max_frequency,
        frames_per_second = cqt.frames_per_second,
        "cqt"
    );
    let kernel = CqtKernel::build(
        sample_rate,
        octave_resolution,
        cqt.min_frequency,
        cqt.max_frequency,
    )?;
    println!(
        "Kernel: {} channels, FFT {}, {} non-zero entries",
        kernel.num_channels(),
        kernel.fft_length(),
        kernel.matrix().nnz()
    );
    Ok(kernel)
}

pub fn run_cqt(args: CqtArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_audio(&args.input)?;
    let kernel = build_kernel(config, sample_rate, args.resolution)?;
    let spectrogram = cqt_spectrogram(
        &samples,
        sample_rate,
        config.cqt.frames_per_second,
        &kernel,
    )?;

    if let Some(channel) = loudest_row(&spectrogram) {
        println!(
            "Strongest channel: {} ({:.1} Hz)",
            channel,
            kernel.frequencies()[channel]
        );
    }

    emit(
        &Labeled {
            kind: "cqt",
            matrix: &spectrogram,
            rows: kernel.frequencies(),
            num_samples: samples.len(),
            sample_rate,
        },
        &args.output,
    )
}

pub fn run_chroma(args: ChromaArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_audio(&args.input)?;
    let kernel = build_kernel(config, sample_rate, args.resolution)?;
    let octave_resolution = kernel.octave_resolution();
    let spectrogram = cqt_spectrogram(
        &samples,
        sample_rate,
        config.cqt.frames_per_second,
        &kernel,
    )?;
    let chroma = fold_chroma(&spectrogram, octave_resolution)?;

    // Pitch class c holds channels c, c + R, ...; label it by its lowest channel.
    let labels: Vec<f64> = kernel
        .frequencies()
        .iter()
        .copied()
        .chain(std::iter::repeat(0.0))
        .take(octave_resolution)
        .collect();

    let totals: Vec<f64> = chroma.rows().into_iter().map(|row| row.sum()).collect();
    let grand_total: f64 = totals.iter().sum();
    if grand_total > 0.0 {
        println!("\nPitch class energy:");
        for (class, total) in totals.iter().enumerate() {
            let share = total / grand_total;
            println!(
                "  {:>2} {:>8.1} Hz {:5.1}% {}",
                class,
                labels[class],
                share * 100.0,
                "#".repeat((share * 60.0) as usize)
            );
        }
    }

    emit(
        &Labeled {
            kind: "chroma",
            matrix: &chroma,
            rows: &labels,
            num_samples: samples.len(),
            sample_rate,
        },
        &args.output,
    )
}
