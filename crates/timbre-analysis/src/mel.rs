//! Mel filterbank, mel spectrogram and MFCC.
//!
//! The filterbank maps the `L/2` positive-frequency STFT bins (DC dropped,
//! Nyquist kept) onto `number_filters` overlapping triangles whose edges are
//! evenly spaced on the mel scale between `sample_rate / L` and
//! `sample_rate / 2`.

use crate::error::{Error, Result};
use crate::matrix::{RealMatrix, from_columns, magnitude_rows, power_rows};
use crate::par::collect_indexed;
use crate::sparse::SparseMatrix;
use crate::spectrogram::Stft;
use crate::trig::{TrigKind, TrigTransform, TrigType};
use ndarray::ArrayView2;

/// Convert frequency in Hz to mels: `2595 · log10(1 + f/700)`.
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mels back to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank `[number_filters, window_length/2]`.
///
/// Column `j` weights STFT bin `j + 1`. Every row peaks at exactly 1, is
/// non-negative and has contiguous support.
#[derive(Debug, Clone, PartialEq)]
pub struct MelFilterBank {
    matrix: SparseMatrix<f64>,
    sample_rate: f64,
    window_length: usize,
    center_frequencies: Vec<f64>,
}

impl MelFilterBank {
    /// Build the filterbank.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `window_length` - STFT window length the filterbank will be applied to
    /// * `num_filters` - Number of triangular filters
    ///
    /// Filters whose edges round to the same bin collapse to a near-impulse
    /// rather than failing.
    pub fn build(sample_rate: f64, window_length: usize, num_filters: usize) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::invalid(
                "sample_rate",
                format!("must be positive, got {sample_rate}"),
            ));
        }
        if window_length < 2 {
            return Err(Error::invalid(
                "window_length",
                format!("must be at least 2, got {window_length}"),
            ));
        }
        if num_filters == 0 {
            return Err(Error::invalid("num_filters", "must be at least 1"));
        }

        let num_bins = window_length / 2;
        let min_mel = hz_to_mel(sample_rate / window_length as f64);
        let max_mel = hz_to_mel(sample_rate / 2.0);
        let mel_step = (max_mel - min_mel) / (num_filters + 1) as f64;

        let edges: Vec<f64> = (0..num_filters + 2)
            .map(|i| mel_to_hz(min_mel + mel_step * i as f64))
            .collect();
        // STFT bin index of each edge; bin b lives in column b − 1.
        let bins: Vec<usize> = edges
            .iter()
            .map(|&hz| {
                (hz * window_length as f64 / sample_rate)
                    .round_ties_even()
                    .max(0.0) as usize
            })
            .collect();

        let mut matrix = SparseMatrix::with_columns(num_bins);
        let mut row = vec![0.0; num_bins];
        let mut collapsed = 0usize;
        for i in 0..num_filters {
            let (left, center, right) = (bins[i], bins[i + 1], bins[i + 2]);
            if left == center || center == right {
                collapsed += 1;
            }
            row.fill(0.0);
            ramp(&mut row, left, center, 0.0, 1.0);
            ramp(&mut row, center, right, 1.0, 0.0);
            matrix.push_dense_row(&row);
        }

        if collapsed > 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                collapsed,
                num_filters,
                window_length,
                "mel bands collapsed to a single bin"
            );
        }

        Ok(Self {
            matrix,
            sample_rate,
            window_length,
            center_frequencies: edges[1..=num_filters].to_vec(),
        })
    }

    /// Number of filters (rows).
    pub fn num_filters(&self) -> usize {
        self.matrix.rows()
    }

    /// Number of STFT bins the filterbank expects (columns), `window_length/2`.
    pub fn num_bins(&self) -> usize {
        self.matrix.cols()
    }

    /// Sample rate the filterbank was built for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Window length the filterbank was built for.
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Peak frequency of each filter in Hz, before rounding to bins.
    pub fn center_frequencies(&self) -> &[f64] {
        &self.center_frequencies
    }

    /// Sparse filter weights.
    pub fn matrix(&self) -> &SparseMatrix<f64> {
        &self.matrix
    }

    /// Dense copy of the filter weights.
    pub fn to_dense(&self) -> RealMatrix {
        self.matrix.to_dense()
    }

    /// Apply the filterbank to a `[window_length/2, frames]` spectrogram.
    pub fn apply(&self, spectrogram: ArrayView2<'_, f64>) -> Result<RealMatrix> {
        self.matrix.mul_dense(spectrogram)
    }

    fn check_window(&self, window: &[f64]) -> Result<()> {
        if window.len() / 2 != self.num_bins() {
            return Err(Error::shape(
                "filterbank columns vs spectrum bins",
                self.num_bins(),
                window.len() / 2,
            ));
        }
        Ok(())
    }
}

/// Linear ramp from `from` to `to` over bins `start..=end`, written into
/// columns `start − 1..=end − 1`. A zero-width ramp writes `from` only, so
/// a collapsed rising edge leaves its single bin to the falling edge's 1.
fn ramp(row: &mut [f64], start: usize, end: usize, from: f64, to: f64) {
    let width = end.saturating_sub(start);
    for k in 0..=width {
        let Some(col) = (start + k).checked_sub(1) else {
            continue;
        };
        if col >= row.len() {
            break;
        }
        row[col] = if width == 0 {
            from
        } else {
            from + (to - from) * k as f64 / width as f64
        };
    }
}

/// Mel spectrogram `[num_filters, number_frames]`.
///
/// Magnitude STFT without DC and mirrored bins, multiplied by the filterbank.
pub fn melspectrogram(
    signal: &[f64],
    window: &[f64],
    step: usize,
    filterbank: &MelFilterBank,
) -> Result<RealMatrix> {
    filterbank.check_window(window)?;
    let stft = Stft::new(window, step)?.forward(signal);
    let magnitude = magnitude_rows(stft.view(), 1..filterbank.num_bins() + 1);
    filterbank.apply(magnitude.view())
}

/// Mel-frequency cepstral coefficients `[num_coefficients, number_frames]`.
///
/// Log of the mel-filtered power spectrogram (offset by machine epsilon),
/// orthonormal DCT-II across filters, then coefficients `1..=num_coefficients`.
/// Coefficient 0 (overall energy) is always dropped, so `num_coefficients`
/// must be below the number of filters.
pub fn mfcc(
    signal: &[f64],
    window: &[f64],
    step: usize,
    filterbank: &MelFilterBank,
    num_coefficients: usize,
) -> Result<RealMatrix> {
    filterbank.check_window(window)?;
    let num_filters = filterbank.num_filters();
    if num_coefficients == 0 || num_coefficients >= num_filters {
        return Err(Error::invalid(
            "num_coefficients",
            format!("must be in 1..{num_filters}, got {num_coefficients}"),
        ));
    }

    let stft = Stft::new(window, step)?.forward(signal);
    let power = power_rows(stft.view(), 1..filterbank.num_bins() + 1);
    let log_mel = filterbank.apply(power.view())?.mapv(|v| (v + f64::EPSILON).ln());

    let dct = TrigTransform::new(TrigKind::Cosine, TrigType::II, num_filters)?;
    let columns = collect_indexed(log_mel.ncols(), |j| {
        let frame = log_mel.column(j).to_vec();
        dct.process(&frame)
            .map(|coeffs| coeffs[1..=num_coefficients].to_vec())
    });
    let columns = columns.into_iter().collect::<Result<Vec<_>>>()?;

    Ok(from_columns(num_coefficients, &columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::Window;
    use crate::spectrogram::frame_count;
    use std::f64::consts::PI;

    fn generate_sine(sample_rate: f64, freq: f64, num_samples: usize) -> Vec<f64> {
        (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_mel_conversion_round_trip() {
        assert!(hz_to_mel(0.0).abs() < 1e-12);
        assert!((hz_to_mel(700.0) - 2595.0 * 2f64.log10()).abs() < 1e-9);
        for hz in [20.0, 440.0, 1000.0, 8000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-9);
        }
    }

    #[test]
    fn test_filterbank_shape_and_rows() {
        let fb = MelFilterBank::build(16000.0, 512, 40).unwrap();
        assert_eq!(fb.matrix().shape(), (40, 256));

        let dense = fb.to_dense();
        for (i, row) in dense.rows().into_iter().enumerate() {
            let max = row.iter().copied().fold(f64::MIN, f64::max);
            assert!((max - 1.0).abs() < 1e-12, "row {} peaks at {}", i, max);
            assert!(row.iter().all(|&v| v >= 0.0));

            let support: Vec<usize> = (0..row.len()).filter(|&j| row[j] > 0.0).collect();
            let first = support[0];
            assert_eq!(support, (first..first + support.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_filterbank_collapsed_bands() {
        // 64 filters over 32 bins: many edges round to the same bin
        let fb = MelFilterBank::build(8000.0, 64, 64).unwrap();
        assert_eq!(fb.num_filters(), 64);
        for row in fb.to_dense().rows() {
            let max = row.iter().copied().fold(f64::MIN, f64::max);
            assert!((max - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_filterbank_centers_increase() {
        let fb = MelFilterBank::build(22050.0, 1024, 20).unwrap();
        let centers = fb.center_frequencies();
        assert_eq!(centers.len(), 20);
        assert!(centers.windows(2).all(|w| w[0] < w[1]));
        assert!(centers[19] < 22050.0 / 2.0);
    }

    #[test]
    fn test_filterbank_invalid_parameters() {
        assert!(MelFilterBank::build(0.0, 512, 40).is_err());
        assert!(MelFilterBank::build(16000.0, 1, 40).is_err());
        assert!(MelFilterBank::build(16000.0, 512, 0).is_err());
    }

    #[test]
    fn test_melspectrogram_shape() {
        let sr = 16000.0;
        let signal = generate_sine(sr, 440.0, 8000);
        let window = Window::Hamming.coefficients(512);
        let fb = MelFilterBank::build(sr, 512, 40).unwrap();
        let mel = melspectrogram(&signal, &window, 256, &fb).unwrap();
        assert_eq!(mel.dim(), (40, frame_count(8000, 512, 256)));
        assert!(mel.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_melspectrogram_peak_follows_tone() {
        let sr = 16000.0;
        let window = Window::Hann.coefficients(512);
        let fb = MelFilterBank::build(sr, 512, 40).unwrap();
        let peak_row = |freq: f64| {
            let mel = melspectrogram(&generate_sine(sr, freq, 4096), &window, 256, &fb).unwrap();
            let mid = mel.ncols() / 2;
            (0..40)
                .max_by(|&a, &b| mel[[a, mid]].total_cmp(&mel[[b, mid]]))
                .unwrap()
        };
        assert!(peak_row(300.0) < peak_row(3000.0));
    }

    #[test]
    fn test_mismatched_filterbank() {
        let window = Window::Hamming.coefficients(512);
        let fb = MelFilterBank::build(16000.0, 1024, 40).unwrap();
        assert!(matches!(
            melspectrogram(&[0.0; 1000], &window, 256, &fb),
            Err(Error::ShapeMismatch { expected: 512, actual: 256, .. })
        ));
        assert!(matches!(
            mfcc(&[0.0; 1000], &window, 256, &fb, 12),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_mfcc_shape_and_silence() {
        let window = Window::Hamming.coefficients(256);
        let fb = MelFilterBank::build(8000.0, 256, 26).unwrap();
        let coeffs = mfcc(&[0.0; 2000], &window, 128, &fb, 13).unwrap();
        assert_eq!(coeffs.dim(), (13, frame_count(2000, 256, 128)));
        // Silence gives a flat log-mel vector, which has no energy beyond coefficient 0
        assert!(coeffs.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_mfcc_coefficient_range() {
        let window = Window::Hamming.coefficients(256);
        let fb = MelFilterBank::build(8000.0, 256, 20).unwrap();
        assert!(mfcc(&[0.0; 500], &window, 128, &fb, 0).is_err());
        assert!(mfcc(&[0.0; 500], &window, 128, &fb, 20).is_err());
        assert!(mfcc(&[0.0; 500], &window, 128, &fb, 19).is_ok());
    }
}
