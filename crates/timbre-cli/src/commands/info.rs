//! Display WAV file metadata and the analysis layout it would get.

use clap::Args;
use timbre_analysis::{CqtKernel, Mdct, constant_q::cqt_step, frame_count};
use timbre_config::AnalysisConfig;
use timbre_io::{WavFormat, read_wav_info};

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    let sample_rate = f64::from(info.sample_rate);
    let num_samples = info.num_frames as usize;

    println!("\nAnalysis profile '{}':", config.name);
    let window_length = config.stft.window_length(sample_rate);
    let step = config.stft.step_length(sample_rate);
    println!(
        "  STFT:   {} window, {} samples, step {} -> {} bins x {} frames",
        config.stft.window,
        window_length,
        step,
        window_length / 2 + 1,
        frame_count(num_samples, window_length, step)
    );
    println!(
        "  Mel:    {} filters, {} coefficients",
        config.mel.filters, config.mel.coefficients
    );

    let cqt = &config.cqt;
    match CqtKernel::build(
        sample_rate,
        cqt.octave_resolution,
        cqt.min_frequency,
        cqt.max_frequency,
    ) {
        Ok(kernel) => {
            let frames = cqt_step(sample_rate, cqt.frames_per_second)
                .map(|s| num_samples / s)
                .unwrap_or(0);
            let highest = kernel.frequencies().last().copied();
            println!(
                "  CQT:    {} channels ({:.1}-{:.1} Hz), FFT {} -> {} frames",
                kernel.num_channels(),
                cqt.min_frequency,
                highest.unwrap_or(cqt.min_frequency),
                kernel.fft_length(),
                frames
            );
            println!(
                "          {} of {} kernel entries kept",
                kernel.matrix().nnz(),
                kernel.num_channels() * kernel.fft_length()
            );
        }
        Err(e) => println!("  CQT:    unavailable at this rate ({e})"),
    }

    let mdct = Mdct::new(&config.mdct.coefficients())?;
    println!(
        "  MDCT:   {:?} window, {} samples -> {} coefficients x {} frames",
        config.mdct.window,
        mdct.window_length(),
        mdct.step(),
        mdct.frame_count(num_samples)
    );

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
