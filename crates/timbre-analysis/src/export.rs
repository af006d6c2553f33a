//! Axis helpers and CSV export for time-frequency matrices.
//!
//! Nothing here renders; these are the numbers a plotting front end needs to
//! label a matrix produced by the transforms (seconds per frame, Hz per row),
//! plus a plain CSV writer for exchange with other tools.

use crate::matrix::RealMatrix;
use crate::mel::{hz_to_mel, mel_to_hz};
use std::io::Write;
use std::path::Path;

/// Time in seconds of frame `frame` when `num_frames` frames span
/// `num_samples` samples at `sample_rate`.
///
/// Frames are assumed evenly spread over the signal, which holds for every
/// transform here up to the padding at the ends.
pub fn frame_to_time(frame: usize, num_frames: usize, num_samples: usize, sample_rate: f64) -> f64 {
    if num_frames == 0 || sample_rate <= 0.0 {
        return 0.0;
    }
    frame as f64 * num_samples as f64 / (sample_rate * num_frames as f64)
}

/// Times of all `num_frames` frames (see [`frame_to_time`]).
pub fn frame_times(num_frames: usize, num_samples: usize, sample_rate: f64) -> Vec<f64> {
    (0..num_frames)
        .map(|j| frame_to_time(j, num_frames, num_samples, sample_rate))
        .collect()
}

/// Frequency in Hz of STFT bin `bin`.
pub fn bin_to_frequency(bin: usize, window_length: usize, sample_rate: f64) -> f64 {
    if window_length == 0 {
        return 0.0;
    }
    bin as f64 * sample_rate / window_length as f64
}

/// Frequencies of bins `first..first + count`.
pub fn bin_frequencies(
    first: usize,
    count: usize,
    window_length: usize,
    sample_rate: f64,
) -> Vec<f64> {
    (first..first + count)
        .map(|k| bin_to_frequency(k, window_length, sample_rate))
        .collect()
}

/// Mel-spaced frequency axis for `num_filters` rows: `num_filters` points
/// evenly spaced in mels over `[sample_rate / window_length, sample_rate / 2]`.
pub fn mel_frequencies(num_filters: usize, window_length: usize, sample_rate: f64) -> Vec<f64> {
    if num_filters == 0 || window_length == 0 {
        return Vec::new();
    }
    let min_mel = hz_to_mel(sample_rate / window_length as f64);
    let max_mel = hz_to_mel(sample_rate / 2.0);
    if num_filters == 1 {
        return vec![mel_to_hz(min_mel)];
    }
    let step = (max_mel - min_mel) / (num_filters - 1) as f64;
    (0..num_filters)
        .map(|i| mel_to_hz(min_mel + step * i as f64))
        .collect()
}

/// Centre frequencies of `num_channels` constant-Q channels.
pub fn channel_frequencies(
    min_frequency: f64,
    octave_resolution: usize,
    num_channels: usize,
) -> Vec<f64> {
    let resolution = octave_resolution.max(1) as f64;
    (0..num_channels)
        .map(|i| min_frequency * 2f64.powf(i as f64 / resolution))
        .collect()
}

/// Convert magnitudes to dB, flooring at -200 dB.
pub fn amplitude_to_db(matrix: &RealMatrix) -> RealMatrix {
    matrix.mapv(|v| 20.0 * v.abs().max(1e-10).log10())
}

/// Write a matrix as CSV with one line per frame.
///
/// The header is `time_s` followed by the row labels (Hz, coefficient index,
/// pitch class, …); each line starts with the frame time. Missing labels fall
/// back to the row or frame index.
///
/// # Arguments
/// * `writer` - Destination
/// * `matrix` - `[row, frame]` matrix
/// * `row_labels` - One value per matrix row
/// * `times` - One time per frame, in seconds
/// * `db_scale` - Convert values to dB first
pub fn write_matrix_csv<W: Write>(
    mut writer: W,
    matrix: &RealMatrix,
    row_labels: &[f64],
    times: &[f64],
    db_scale: bool,
) -> std::io::Result<()> {
    write!(writer, "time_s")?;
    for r in 0..matrix.nrows() {
        let label = row_labels.get(r).copied().unwrap_or(r as f64);
        write!(writer, ",{label:.2}")?;
    }
    writeln!(writer)?;

    for (j, column) in matrix.columns().into_iter().enumerate() {
        let time = times.get(j).copied().unwrap_or(j as f64);
        write!(writer, "{time:.6}")?;
        for &value in column {
            let value = if db_scale {
                20.0 * value.abs().max(1e-10).log10()
            } else {
                value
            };
            write!(writer, ",{value:.6}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

/// Write a matrix to a CSV file (see [`write_matrix_csv`]).
pub fn export_matrix_csv(
    path: impl AsRef<Path>,
    matrix: &RealMatrix,
    row_labels: &[f64],
    times: &[f64],
    db_scale: bool,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_matrix_csv(std::io::BufWriter::new(file), matrix, row_labels, times, db_scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_frame_times() {
        // 10 frames over 1 s
        let t = frame_times(10, 8000, 8000.0);
        assert_eq!(t.len(), 10);
        assert!((t[5] - 0.5).abs() < 1e-12);
        assert_eq!(frame_to_time(3, 0, 100, 8000.0), 0.0);
    }

    #[test]
    fn test_bin_frequencies() {
        assert!((bin_to_frequency(32, 256, 8000.0) - 1000.0).abs() < 1e-12);
        let f = bin_frequencies(1, 3, 8, 800.0);
        assert_eq!(f, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_mel_and_channel_axes() {
        let mel = mel_frequencies(8, 512, 16000.0);
        assert_eq!(mel.len(), 8);
        assert!((mel[0] - 16000.0 / 512.0).abs() < 1e-9);
        assert!((mel[7] - 8000.0).abs() < 1e-6);

        let cq = channel_frequencies(55.0, 12, 25);
        assert!((cq[12] - 110.0).abs() < 1e-9);
        assert!((cq[24] - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_csv() {
        let m = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let mut out = Vec::new();
        write_matrix_csv(&mut out, &m, &[100.0, 200.0], &[0.0, 0.5, 1.0], false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "time_s,100.00,200.00");
        assert_eq!(lines[2], "0.500000,2.000000,5.000000");
    }

    #[test]
    fn test_export_csv_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");
        let m = array![[1.0, 10.0]];
        export_matrix_csv(&path, &m, &[], &[], true).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("0.000000,0.000000"));
        assert!(text.contains("1.000000,20.000000"));
    }
}
