//! STFT analysis and overlap-add synthesis
//!
//! The forward transform centers analysis windows on frame boundaries by
//! zero-padding `floor(L/2)` samples in front of the signal, then returns the
//! full `L`-bin spectrum of every frame (mirrored upper half included) so the
//! inverse can reconstruct without assuming a real input.
//!
//! The inverse overlap-adds the real parts of the inverse FFTs, trims `L - S`
//! samples from both ends and divides by the overlap-add gain
//! `Σ window[0 : L : S]`. Reconstruction is exact when the window/step pair
//! satisfies the constant-overlap-add (COLA) condition; with the trim above the
//! output is aligned with the input when `S = L/2`.

use crate::error::{Error, Result};
use crate::fft::Fft;
use crate::matrix::{ComplexMatrix, from_columns};
use crate::par::collect_indexed;
use rustfft::num_complex::Complex;

/// Number of frames `stft` produces for `num_samples` samples.
///
/// `ceil((N + 2·floor(L/2) − L) / S) + 1`.
pub fn frame_count(num_samples: usize, window_length: usize, step: usize) -> usize {
    let span = num_samples + 2 * (window_length / 2);
    // span - L is at least -1 (odd L); ceil of a value in (-1, 0] is 0.
    span.saturating_sub(window_length).div_ceil(step.max(1)) + 1
}

/// Short-time Fourier transform with a fixed window and step.
///
/// Construction validates the parameters and plans the FFT once; `forward`
/// and `inverse` can then be called on any number of signals.
#[derive(Debug)]
pub struct Stft {
    window: Vec<f64>,
    step: usize,
    fft: Fft,
}

impl Stft {
    /// Create a new STFT for the given window coefficients and step length.
    ///
    /// # Arguments
    /// * `window` - Window coefficients; its length is the frame (and FFT) length
    /// * `step` - Hop between successive frames, `1..=window.len()`
    pub fn new(window: &[f64], step: usize) -> Result<Self> {
        if window.is_empty() {
            return Err(Error::invalid("window", "window must not be empty"));
        }
        if step == 0 || step > window.len() {
            return Err(Error::invalid(
                "step",
                format!("step must be in 1..={}, got {}", window.len(), step),
            ));
        }

        Ok(Self {
            window: window.to_vec(),
            step,
            fft: Fft::new(window.len()),
        })
    }

    /// Window length `L` (also the number of frequency bins).
    pub fn window_length(&self) -> usize {
        self.window.len()
    }

    /// Step length `S` between frames.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Window coefficients.
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// Overlap-add gain `Σ window[0 : L : S]` used to normalize synthesis.
    pub fn cola_gain(&self) -> f64 {
        self.window.iter().step_by(self.step).sum()
    }

    /// Number of frames produced for a signal of `num_samples` samples.
    pub fn frame_count(&self, num_samples: usize) -> usize {
        frame_count(num_samples, self.window.len(), self.step)
    }

    /// Compute the complex STFT `[window_length, number_frames]`.
    pub fn forward(&self, signal: &[f64]) -> ComplexMatrix {
        let window_length = self.window.len();
        let step = self.step;
        let pad = window_length / 2;
        let num_frames = self.frame_count(signal.len());

        // Covers num_frames·S + (L − S); the end pad is whatever is left over.
        let padded_len = num_frames * step + (window_length - step);
        let mut padded = vec![0.0; padded_len];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            num_samples = signal.len(),
            window_length,
            step,
            num_frames,
            end_pad = padded_len - pad - signal.len(),
            "stft"
        );

        let columns = collect_indexed(num_frames, |j| {
            let start = j * step;
            let mut frame: Vec<Complex<f64>> = padded[start..start + window_length]
                .iter()
                .zip(self.window.iter())
                .map(|(&x, &w)| Complex::new(x * w, 0.0))
                .collect();
            self.fft.forward_complex(&mut frame);
            frame
        });

        from_columns(window_length, &columns)
    }

    /// Reconstruct a signal from its STFT by overlap-add.
    ///
    /// Returns `number_frames·S − L + S` samples (empty if that is not
    /// positive). Fails if the matrix has the wrong number of rows or the
    /// window has zero overlap-add gain at this step.
    ///
    /// Sample `n` of the output is input sample `n + L/2 − S`, so the output
    /// lines up with the input only when `S = L/2`. Other COLA steps give a
    /// copy shifted by `L/2 − S` samples.
    pub fn inverse(&self, stft_matrix: &ComplexMatrix) -> Result<Vec<f64>> {
        let window_length = self.window.len();
        let step = self.step;
        let (rows, num_frames) = stft_matrix.dim();
        if rows != window_length {
            return Err(Error::shape("stft rows vs window length", window_length, rows));
        }

        let gain = self.cola_gain();
        if gain == 0.0 || !gain.is_finite() {
            return Err(Error::DegenerateParameter(format!(
                "window has overlap-add gain {gain} at step {step}"
            )));
        }

        let total = num_frames * step + (window_length - step);
        let mut signal = vec![0.0; total];
        let mut frame = vec![Complex::new(0.0, 0.0); window_length];

        for (j, column) in stft_matrix.columns().into_iter().enumerate() {
            for (dst, &src) in frame.iter_mut().zip(column.iter()) {
                *dst = src;
            }
            self.fft.inverse_complex(&mut frame);

            let start = j * step;
            for (out, c) in signal[start..start + window_length].iter_mut().zip(frame.iter()) {
                *out += c.re;
            }
        }

        let trim = window_length - step;
        if total <= 2 * trim {
            return Ok(Vec::new());
        }

        Ok(signal[trim..total - trim].iter().map(|&x| x / gain).collect())
    }
}

/// Compute the STFT of `signal` (see [`Stft::forward`]).
pub fn stft(signal: &[f64], window: &[f64], step: usize) -> Result<ComplexMatrix> {
    Ok(Stft::new(window, step)?.forward(signal))
}

/// Compute the inverse STFT of `stft_matrix` (see [`Stft::inverse`]).
pub fn istft(stft_matrix: &ComplexMatrix, window: &[f64], step: usize) -> Result<Vec<f64>> {
    Stft::new(window, step)?.inverse(stft_matrix)
}
