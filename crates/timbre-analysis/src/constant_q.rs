//! Constant-Q transform: spectral kernel, spectrogram and chromagram
//!
//! Channels are spaced geometrically, `octave_resolution` per octave, and each
//! channel's analysis window shrinks with its frequency so that the ratio of
//! centre frequency to bandwidth (the quality factor Q) stays constant.
//!
//! The kernel is built once in the frequency domain (Brown-Puckette): each
//! channel's Hamming-windowed complex exponential is centred in an
//! `fft_length` row and Fourier transformed. Coefficients below
//! [`SPARSITY_THRESHOLD`] are dropped and the rest conjugated and divided by
//! `fft_length`, so a channel's CQT value is the sparse dot product of its
//! kernel row with the FFT of the frame (Parseval).

use crate::error::{Error, Result};
use crate::fft::{Fft, Window};
use crate::matrix::{RealMatrix, from_columns};
use crate::par::collect_indexed;
use crate::sparse::SparseMatrix;
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Spectral kernel coefficients with a smaller magnitude (before
/// normalization by the FFT length) are stored as structural zeros.
pub const SPARSITY_THRESHOLD: f64 = 0.01;

/// Largest FFT length a kernel may require.
///
/// A very low minimum frequency or a very fine octave resolution makes the
/// lowest channel's window grow without bound.
pub const MAX_FFT_LENGTH: usize = 1 << 24;

/// Sparse constant-Q spectral kernel `[number_channels, fft_length]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CqtKernel {
    kernel: SparseMatrix<Complex<f64>>,
    sample_rate: f64,
    octave_resolution: usize,
    quality_factor: f64,
    frequencies: Vec<f64>,
}

impl CqtKernel {
    /// Build the kernel.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `octave_resolution` - Channels per octave (12 for semitones)
    /// * `min_frequency` - Centre frequency of the lowest channel in Hz
    /// * `max_frequency` - Upper end of the analysed range in Hz
    ///
    /// `number_channels = round(octave_resolution · log2(max/min))`, and
    /// `fft_length` is the smallest power of two holding the lowest channel's
    /// window.
    pub fn build(
        sample_rate: f64,
        octave_resolution: usize,
        min_frequency: f64,
        max_frequency: f64,
    ) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::invalid(
                "sample_rate",
                format!("must be positive, got {sample_rate}"),
            ));
        }
        if octave_resolution == 0 {
            return Err(Error::invalid("octave_resolution", "must be at least 1"));
        }
        if !(min_frequency.is_finite() && min_frequency > 0.0) {
            return Err(Error::invalid(
                "min_frequency",
                format!("must be positive, got {min_frequency}"),
            ));
        }
        if !(max_frequency.is_finite() && max_frequency > min_frequency) {
            return Err(Error::invalid(
                "max_frequency",
                format!("must exceed min_frequency ({min_frequency}), got {max_frequency}"),
            ));
        }

        let resolution = octave_resolution as f64;
        let quality_factor = 1.0 / (2f64.powf(1.0 / resolution) - 1.0);
        // Checked before any window length is cast to an integer.
        let longest = quality_factor * sample_rate / min_frequency;
        if !longest.is_finite() || longest > MAX_FFT_LENGTH as f64 {
            return Err(Error::DegenerateParameter(format!(
                "lowest channel needs a {longest:.0}-sample window, \
                 above the {MAX_FFT_LENGTH} limit"
            )));
        }
        let num_channels =
            (resolution * (max_frequency / min_frequency).log2()).round_ties_even() as usize;
        if num_channels == 0 {
            return Err(Error::invalid(
                "max_frequency",
                format!("range {min_frequency}..{max_frequency} Hz holds no channel"),
            ));
        }

        let frequencies: Vec<f64> = (0..num_channels)
            .map(|i| min_frequency * 2f64.powf(i as f64 / resolution))
            .collect();
        let window_lengths: Vec<usize> = frequencies
            .iter()
            .map(|&f| 2 * (quality_factor * sample_rate / f / 2.0).round_ties_even() as usize + 1)
            .collect();

        // The nearest odd length can round past the power of two.
        let longest_window = window_lengths.iter().copied().max().unwrap_or(1);
        let fft_length = (longest.ceil().max(1.0) as usize)
            .next_power_of_two()
            .max(longest_window.next_power_of_two());

        let fft = Fft::new(fft_length);
        let rows = collect_indexed(num_channels, |i| {
            spectral_row(&fft, quality_factor, window_lengths[i])
                .into_iter()
                .enumerate()
                .filter(|(_, c)| c.norm() >= SPARSITY_THRESHOLD)
                .map(|(k, c)| (k, c.conj() / fft_length as f64))
                .collect::<Vec<_>>()
        });

        let mut kernel = SparseMatrix::with_columns(fft_length);
        for row in rows {
            kernel.push_row(row);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            num_channels,
            fft_length,
            nnz = kernel.nnz(),
            density = kernel.nnz() as f64 / (num_channels * fft_length) as f64,
            "cqt kernel"
        );

        Ok(Self {
            kernel,
            sample_rate,
            octave_resolution,
            quality_factor,
            frequencies,
        })
    }

    /// Number of frequency channels (rows).
    pub fn num_channels(&self) -> usize {
        self.kernel.rows()
    }

    /// FFT length (columns).
    pub fn fft_length(&self) -> usize {
        self.kernel.cols()
    }

    /// Sample rate the kernel was built for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Channels per octave.
    pub fn octave_resolution(&self) -> usize {
        self.octave_resolution
    }

    /// Ratio of centre frequency to bandwidth.
    pub fn quality_factor(&self) -> f64 {
        self.quality_factor
    }

    /// Centre frequency of each channel in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Nearest channel to `frequency`, clamped to the kernel's range.
    pub fn frequency_to_channel(&self, frequency: f64) -> usize {
        let Some(&min) = self.frequencies.first() else {
            return 0;
        };
        if frequency <= min {
            return 0;
        }
        let channel = (self.octave_resolution as f64 * (frequency / min).log2()).round() as usize;
        channel.min(self.num_channels() - 1)
    }

    /// Sparse spectral kernel.
    pub fn matrix(&self) -> &SparseMatrix<Complex<f64>> {
        &self.kernel
    }
}

/// Unthresholded spectral kernel of one channel: the FFT of its centred
/// temporal kernel.
fn spectral_row(fft: &Fft, quality_factor: f64, window_length: usize) -> Vec<Complex<f64>> {
    let fft_length = fft.size();
    let window = Window::Hamming.symmetric_coefficients(window_length);
    let half = (window_length - 1) as f64 / 2.0;
    let scale = 1.0 / window_length as f64;

    let mut row = vec![Complex::new(0.0, 0.0); fft_length];
    let pad = (fft_length + 1 - window_length) / 2;
    for (n, &w) in window.iter().enumerate() {
        let t = n as f64 - half;
        let phase = 2.0 * PI * quality_factor * t / window_length as f64;
        row[pad + n] = Complex::from_polar(w * scale, phase);
    }
    fft.forward_complex(&mut row);
    row
}

/// Frame step in samples for a frame rate, `round(sample_rate / frames_per_second)`.
pub fn cqt_step(sample_rate: f64, frames_per_second: f64) -> Result<usize> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(Error::invalid(
            "sample_rate",
            format!("must be positive, got {sample_rate}"),
        ));
    }
    if !(frames_per_second.is_finite() && frames_per_second > 0.0) {
        return Err(Error::invalid(
            "frames_per_second",
            format!("must be positive, got {frames_per_second}"),
        ));
    }
    let step = (sample_rate / frames_per_second).round_ties_even();
    if step < 1.0 {
        return Err(Error::invalid(
            "frames_per_second",
            format!("{frames_per_second} frames per second exceeds {sample_rate} Hz"),
        ));
    }
    Ok(step as usize)
}

/// Magnitude CQT spectrogram `[number_channels, floor(N / step)]`.
///
/// The signal is padded by `ceil((fft_length − step)/2)` in front and
/// `floor((fft_length − step)/2)` behind, so frame `j` covers the
/// `fft_length` samples centred on the `step`-long block starting at `j·step`.
pub fn cqt_spectrogram(
    signal: &[f64],
    sample_rate: f64,
    frames_per_second: f64,
    kernel: &CqtKernel,
) -> Result<RealMatrix> {
    let step = cqt_step(sample_rate, frames_per_second)?;
    let fft_length = kernel.fft_length();
    let num_frames = signal.len() / step;

    let extra = fft_length.saturating_sub(step);
    let front = extra.div_ceil(2);
    let mut padded = vec![0.0; front + signal.len() + extra / 2];
    padded[front..front + signal.len()].copy_from_slice(signal);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        num_samples = signal.len(),
        step,
        fft_length,
        num_frames,
        "cqt spectrogram"
    );

    let fft = Fft::new(fft_length);
    let columns = collect_indexed(num_frames, |j| {
        let start = (j * step).min(padded.len());
        let end = (start + fft_length).min(padded.len());
        let mut frame: Vec<Complex<f64>> =
            padded[start..end].iter().map(|&x| Complex::new(x, 0.0)).collect();
        frame.resize(fft_length, Complex::new(0.0, 0.0));
        fft.forward_complex(&mut frame);

        kernel
            .matrix()
            .mul_vec(&frame)
            .map(|values| values.iter().map(|c| c.norm()).collect::<Vec<f64>>())
    });
    let columns = columns.into_iter().collect::<Result<Vec<_>>>()?;

    Ok(from_columns(kernel.num_channels(), &columns))
}

/// Fold a CQT spectrogram into `octave_resolution` pitch classes.
///
/// Row `c` is the sum of spectrogram rows `c, c + R, c + 2R, …`.
pub fn fold_chroma(spectrogram: &RealMatrix, octave_resolution: usize) -> Result<RealMatrix> {
    if octave_resolution == 0 {
        return Err(Error::invalid("octave_resolution", "must be at least 1"));
    }
    let mut chroma = RealMatrix::zeros((octave_resolution, spectrogram.ncols()));
    for (channel, row) in spectrogram.rows().into_iter().enumerate() {
        let mut target = chroma.row_mut(channel % octave_resolution);
        target += &row;
    }
    Ok(chroma)
}

/// CQT chromagram `[octave_resolution, number_frames]`.
pub fn cqt_chromagram(
    signal: &[f64],
    sample_rate: f64,
    frames_per_second: f64,
    octave_resolution: usize,
    kernel: &CqtKernel,
) -> Result<RealMatrix> {
    if octave_resolution == 0 {
        return Err(Error::invalid("octave_resolution", "must be at least 1"));
    }
    let spectrogram = cqt_spectrogram(signal, sample_rate, frames_per_second, kernel)?;
    fold_chroma(&spectrogram, octave_resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_sine(sample_rate: f64, freq: f64, num_samples: usize) -> Vec<f64> {
        (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_kernel_dimensions() {
        let kernel = CqtKernel::build(8000.0, 12, 110.0, 1760.0).unwrap();
        // 12 · log2(16) = 48 channels
        assert_eq!(kernel.num_channels(), 48);
        let q = 1.0 / (2f64.powf(1.0 / 12.0) - 1.0);
        assert!((kernel.quality_factor() - q).abs() < 1e-12);
        // Q·sr/fmin ≈ 1230 → 2048
        assert_eq!(kernel.fft_length(), 2048);
        assert!((kernel.frequencies()[12] - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_kernel_sparsity_threshold() {
        let kernel = CqtKernel::build(8000.0, 12, 220.0, 880.0).unwrap();
        let fft_length = kernel.fft_length();
        let fft = Fft::new(fft_length);
        let q = kernel.quality_factor();

        for (i, &f) in kernel.frequencies().iter().enumerate() {
            let window_length = 2 * (q * 8000.0 / f / 2.0).round_ties_even() as usize + 1;
            let dense = spectral_row(&fft, q, window_length);
            for (k, c) in dense.iter().enumerate() {
                let stored = kernel.matrix().get(i, k);
                if c.norm() < SPARSITY_THRESHOLD {
                    assert_eq!(stored, Complex::new(0.0, 0.0));
                } else {
                    assert!((stored - c.conj() / fft_length as f64).norm() < 1e-15);
                }
            }
        }
        // Most of every row is thresholded away
        assert!(kernel.matrix().nnz() < kernel.num_channels() * fft_length / 4);
    }

    #[test]
    fn test_kernel_window_exceeding_power_of_two() {
        // Q·sr/fmin = 1024 exactly with Q = 1 (octave resolution 1):
        // the nearest odd window is 1025 samples.
        let kernel = CqtKernel::build(1024.0, 1, 1.0, 4.0).unwrap();
        assert_eq!(kernel.fft_length(), 2048);
        assert_eq!(kernel.num_channels(), 2);
    }

    #[test]
    fn test_kernel_invalid_parameters() {
        assert!(CqtKernel::build(0.0, 12, 55.0, 880.0).is_err());
        assert!(CqtKernel::build(8000.0, 0, 55.0, 880.0).is_err());
        assert!(CqtKernel::build(8000.0, 12, 880.0, 55.0).is_err());
        assert!(CqtKernel::build(8000.0, 12, -1.0, 55.0).is_err());
        assert!(matches!(
            CqtKernel::build(48000.0, 1200, 0.01, 0.02),
            Err(Error::DegenerateParameter(_))
        ));
    }

    #[test]
    fn test_kernel_vanishing_min_frequency() {
        // The window length overflows usize long before it overflows f64
        assert!(matches!(
            CqtKernel::build(48000.0, 12, 1e-300, 1e-299),
            Err(Error::DegenerateParameter(_))
        ));
        assert!(matches!(
            CqtKernel::build(48000.0, 12, 1e-300, 1e300),
            Err(Error::DegenerateParameter(_))
        ));
    }

    #[test]
    fn test_frequency_to_channel() {
        let kernel = CqtKernel::build(8000.0, 12, 110.0, 880.0).unwrap();
        assert_eq!(kernel.frequency_to_channel(50.0), 0);
        assert_eq!(kernel.frequency_to_channel(220.0), 12);
        assert_eq!(kernel.frequency_to_channel(10000.0), kernel.num_channels() - 1);
    }

    #[test]
    fn test_spectrogram_shape_and_peak() {
        let sr = 8000.0;
        let kernel = CqtKernel::build(sr, 12, 110.0, 1760.0).unwrap();
        let signal = generate_sine(sr, 440.0, 16000);
        let spec = cqt_spectrogram(&signal, sr, 25.0, &kernel).unwrap();
        // step 320 → floor(16000 / 320) frames
        assert_eq!(spec.dim(), (48, 50));

        let mid = spec.ncols() / 2;
        let peak = (0..48)
            .max_by(|&a, &b| spec[[a, mid]].total_cmp(&spec[[b, mid]]))
            .unwrap();
        assert_eq!(peak, kernel.frequency_to_channel(440.0));
    }

    #[test]
    fn test_short_signal_has_no_frames() {
        let kernel = CqtKernel::build(8000.0, 12, 220.0, 880.0).unwrap();
        let spec = cqt_spectrogram(&[0.5; 100], 8000.0, 25.0, &kernel).unwrap();
        assert_eq!(spec.dim(), (24, 0));
    }

    #[test]
    fn test_chromagram_folds_octaves() {
        let sr = 8000.0;
        let kernel = CqtKernel::build(sr, 12, 110.0, 1760.0).unwrap();
        let signal: Vec<f64> = generate_sine(sr, 220.0, 8000)
            .iter()
            .zip(generate_sine(sr, 660.0, 8000))
            .map(|(a, b)| a + 0.5 * b)
            .collect();

        let spec = cqt_spectrogram(&signal, sr, 20.0, &kernel).unwrap();
        let chroma = cqt_chromagram(&signal, sr, 20.0, 12, &kernel).unwrap();
        assert_eq!(chroma.dim(), (12, spec.ncols()));

        for c in 0..12 {
            for j in 0..spec.ncols() {
                let expected: f64 = (c..48).step_by(12).map(|r| spec[[r, j]]).sum();
                assert!((chroma[[c, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_invalid_frame_rate() {
        let kernel = CqtKernel::build(8000.0, 12, 220.0, 880.0).unwrap();
        assert!(cqt_spectrogram(&[0.0; 1000], 8000.0, 0.0, &kernel).is_err());
        assert!(cqt_spectrogram(&[0.0; 1000], 8000.0, 1e6, &kernel).is_err());
        assert!(fold_chroma(&RealMatrix::zeros((4, 2)), 0).is_err());
    }
}
