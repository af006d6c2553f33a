//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use timbre_analysis::RealMatrix;
use timbre_analysis::export::{amplitude_to_db, frame_times, write_matrix_csv};
use timbre_config::{AnalysisConfig, BUILTIN_PROFILES, default_config_path, find_profile};
use timbre_io::read_wav;

/// Resolve the analysis profile.
///
/// Searches in this order:
/// 1. Built-in profiles (by name)
/// 2. Saved user profiles (by name) or a TOML path
/// 3. With no name, the default config file if it exists, else `music`
pub fn load_config(name: Option<&str>) -> anyhow::Result<AnalysisConfig> {
    let Some(name) = name else {
        let path = default_config_path();
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading default config");
            return AnalysisConfig::load(&path)
                .with_context(|| format!("loading {}", path.display()));
        }
        return Ok(AnalysisConfig::default());
    };

    if BUILTIN_PROFILES.contains(&name) {
        return Ok(AnalysisConfig::profile(name)?);
    }

    if let Some(path) = find_profile(name) {
        return AnalysisConfig::load(&path)
            .with_context(|| format!("loading {}", path.display()));
    }

    anyhow::bail!(
        "Profile '{}' not found. Use 'timbre profiles list' to see available profiles.",
        name
    )
}

/// Read a WAV file as mono samples and its sampling rate.
pub fn load_audio(path: &Path) -> anyhow::Result<(Vec<f64>, f64)> {
    let (samples, spec) =
        read_wav(path).with_context(|| format!("reading {}", path.display()))?;
    let sample_rate = f64::from(spec.sample_rate);
    println!(
        "{}: {} samples, {} Hz, {:.2}s",
        path.display(),
        samples.len(),
        spec.sample_rate,
        samples.len() as f64 / sample_rate
    );
    Ok((samples, sample_rate))
}

/// Matrix file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per frame, one column per row of the matrix
    Csv,
    /// Object with `rows`, `times` and row-major `values`
    Json,
}

/// Where and how to write a result matrix.
#[derive(Args)]
pub struct OutputArgs {
    /// Output file (format follows the extension unless --format is given)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write values in dB
    #[arg(long)]
    pub db: bool,
}

impl OutputArgs {
    fn resolved_format(&self, path: &Path) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
                OutputFormat::Json
            } else {
                OutputFormat::Csv
            }
        })
    }
}

#[derive(Serialize)]
struct MatrixJson<'a> {
    kind: &'a str,
    sample_rate: f64,
    db: bool,
    rows: &'a [f64],
    times: &'a [f64],
    values: Vec<Vec<f64>>,
}

/// A result matrix with its axes.
pub struct Labeled<'a> {
    /// What the rows are, e.g. `stft`, `mel`, `chroma`
    pub kind: &'a str,
    /// `[row, frame]` values
    pub matrix: &'a RealMatrix,
    /// One label per row (Hz, coefficient index, pitch class)
    pub rows: &'a [f64],
    /// Samples in the analysed signal
    pub num_samples: usize,
    /// Sampling rate of the analysed signal
    pub sample_rate: f64,
}

/// Print the matrix shape and write it out if requested.
pub fn emit(result: &Labeled<'_>, output: &OutputArgs) -> anyhow::Result<()> {
    let matrix = result.matrix;
    println!(
        "{}: {} rows x {} frames",
        result.kind,
        matrix.nrows(),
        matrix.ncols()
    );

    let Some(path) = &output.output else {
        return Ok(());
    };

    let times = frame_times(matrix.ncols(), result.num_samples, result.sample_rate);
    match output.resolved_format(path) {
        OutputFormat::Csv => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_matrix_csv(
                std::io::BufWriter::new(file),
                matrix,
                result.rows,
                &times,
                output.db,
            )?;
        }
        OutputFormat::Json => {
            let values = if output.db {
                amplitude_to_db(matrix)
            } else {
                matrix.clone()
            };
            let json = MatrixJson {
                kind: result.kind,
                sample_rate: result.sample_rate,
                db: output.db,
                rows: result.rows,
                times: &times,
                values: values.rows().into_iter().map(|row| row.to_vec()).collect(),
            };
            let mut writer = std::io::BufWriter::new(
                std::fs::File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?,
            );
            serde_json::to_writer_pretty(&mut writer, &json)?;
            writer.flush()?;
        }
    }

    tracing::info!(path = %path.display(), "wrote {}", result.kind);
    println!("Wrote {} to {}", result.kind, path.display());
    Ok(())
}

/// Index of the row with the largest total energy.
pub fn loudest_row(matrix: &RealMatrix) -> Option<usize> {
    matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v * v).sum::<f64>())
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Largest absolute difference over the common length.
pub fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loudest_row_picks_max_energy() {
        let matrix =
            RealMatrix::from_shape_vec((3, 2), vec![1.0, 1.0, 3.0, 0.0, -2.0, 2.0]).unwrap();
        assert_eq!(loudest_row(&matrix), Some(1));
        assert_eq!(loudest_row(&RealMatrix::zeros((0, 4))), None);
    }

    #[test]
    fn max_abs_error_uses_common_length() {
        assert_eq!(max_abs_error(&[1.0, 2.0, 3.0], &[1.0, 2.5]), 0.5);
        assert_eq!(max_abs_error(&[], &[1.0]), 0.0);
    }

    #[test]
    fn format_follows_extension() {
        let args = OutputArgs {
            output: None,
            format: None,
            db: false,
        };
        assert_eq!(args.resolved_format(Path::new("a.JSON")), OutputFormat::Json);
        assert_eq!(args.resolved_format(Path::new("a.csv")), OutputFormat::Csv);
        assert_eq!(args.resolved_format(Path::new("a")), OutputFormat::Csv);

        let forced = OutputArgs {
            format: Some(OutputFormat::Json),
            ..args
        };
        assert_eq!(forced.resolved_format(Path::new("a.csv")), OutputFormat::Json);
    }

    #[test]
    fn builtin_profile_resolves() {
        assert_eq!(load_config(Some("speech")).unwrap().name, "speech");
        assert!(load_config(Some("no_such_profile_12345")).is_err());
    }
}
