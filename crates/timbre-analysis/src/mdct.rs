//! Modified discrete cosine transform with time-domain aliasing cancellation.
//!
//! Frames overlap by exactly half a window: the step is `L/2` and each frame
//! yields `L/2` real coefficients, so the transform is critically sampled.
//! Truncating to half the bins aliases every frame in time; overlap-adding
//! neighbouring inverse frames cancels that aliasing when the window is
//! symmetric and power-complementary (`w[n]² + w[n + L/2]² = 1`, the
//! Princen-Bradley condition). The sine, Vorbis and Kaiser-Bessel-derived
//! windows all qualify.
//!
//! Both directions run on a single length-`L` FFT with complex twiddles
//! before and after.

use crate::error::{Error, Result};
use crate::fft::Fft;
use crate::matrix::{RealMatrix, from_columns};
use crate::par::collect_indexed;
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Check the symmetry and power-complementarity an MDCT window needs for
/// perfect reconstruction, to within `tolerance`.
pub fn is_princen_bradley(window: &[f64], tolerance: f64) -> bool {
    let len = window.len();
    if len == 0 || len % 2 != 0 {
        return false;
    }
    let half = len / 2;
    let symmetric = (0..half).all(|n| (window[n] - window[len - 1 - n]).abs() <= tolerance);
    let complementary = (0..half).all(|n| {
        let sum = window[n] * window[n] + window[n + half] * window[n + half];
        (sum - 1.0).abs() <= tolerance
    });
    symmetric && complementary
}

/// MDCT/IMDCT pair for a fixed window.
#[derive(Debug)]
pub struct Mdct {
    window: Vec<f64>,
    fft: Fft,
    /// `exp(−iπn/L)` for `n` in `0..L`.
    forward_pre: Vec<Complex<f64>>,
    /// `exp(−iπ/L · (L/2 + 1) · (k + ½))` for `k` in `0..L/2`.
    forward_post: Vec<Complex<f64>>,
    /// `exp(−iπ/L · (L/2 + 1) · k)` for `k` in `0..L/2`.
    inverse_pre: Vec<Complex<f64>>,
    /// `exp(−iπ/L · (n + ½ + L/4)) / (L/2)` for `n` in `0..L`.
    inverse_post: Vec<Complex<f64>>,
}

impl Mdct {
    /// Create an MDCT for the given window.
    ///
    /// The window length must be even and non-zero; the step is half of it.
    /// The window itself is not checked for perfect reconstruction, see
    /// [`is_princen_bradley`].
    pub fn new(window: &[f64]) -> Result<Self> {
        let len = window.len();
        if len == 0 || len % 2 != 0 {
            return Err(Error::invalid(
                "window",
                format!("MDCT window length must be even and non-zero, got {len}"),
            ));
        }
        let half = len / 2;
        let l = len as f64;
        let f = half as f64;

        let forward_pre = (0..len)
            .map(|n| Complex::from_polar(1.0, -PI * n as f64 / l))
            .collect();
        let forward_post = (0..half)
            .map(|k| Complex::from_polar(1.0, -PI / l * (f + 1.0) * (k as f64 + 0.5)))
            .collect();
        let inverse_pre = (0..half)
            .map(|k| Complex::from_polar(1.0, -PI / l * (f + 1.0) * k as f64))
            .collect();
        let inverse_post = (0..len)
            .map(|n| Complex::from_polar(1.0 / f, -PI / l * (n as f64 + 0.5 + f / 2.0)))
            .collect();

        Ok(Self {
            window: window.to_vec(),
            fft: Fft::new(len),
            forward_pre,
            forward_post,
            inverse_pre,
            inverse_post,
        })
    }

    /// Window length `L`.
    pub fn window_length(&self) -> usize {
        self.window.len()
    }

    /// Step between frames, and number of coefficients per frame (`L/2`).
    pub fn step(&self) -> usize {
        self.window.len() / 2
    }

    /// Number of frames produced for `num_samples` samples: `ceil(N / step) + 1`.
    pub fn frame_count(&self, num_samples: usize) -> usize {
        num_samples.div_ceil(self.step()) + 1
    }

    /// Forward MDCT, `[L/2, number_frames]`.
    pub fn forward(&self, signal: &[f64]) -> RealMatrix {
        let len = self.window.len();
        let step = self.step();
        let num_frames = self.frame_count(signal.len());

        // One step in front, the rest at the end: (T + 2)·step samples total.
        let mut padded = vec![0.0; (num_frames + 2) * step];
        padded[step..step + signal.len()].copy_from_slice(signal);

        #[cfg(feature = "tracing")]
        tracing::debug!(num_samples = signal.len(), window_length = len, num_frames, "mdct");

        let columns = collect_indexed(num_frames, |j| {
            let start = j * step;
            let mut frame: Vec<Complex<f64>> = padded[start..start + len]
                .iter()
                .zip(&self.window)
                .zip(&self.forward_pre)
                .map(|((&x, &w), &t)| t * (x * w))
                .collect();
            self.fft.forward_complex(&mut frame);
            frame[..step]
                .iter()
                .zip(&self.forward_post)
                .map(|(&c, &t)| (c * t).re)
                .collect::<Vec<f64>>()
        });

        from_columns(step, &columns)
    }

    /// Inverse MDCT by overlap-add.
    ///
    /// Returns `step · (number_frames − 1)` samples, at least as many as the
    /// signal passed to [`Mdct::forward`]; the tail past the original length
    /// is padding.
    pub fn inverse(&self, mdct_matrix: &RealMatrix) -> Result<Vec<f64>> {
        let len = self.window.len();
        let step = self.step();
        let (rows, num_frames) = mdct_matrix.dim();
        if rows != step {
            return Err(Error::shape("mdct rows vs half window length", step, rows));
        }

        let total = step * (num_frames + 1);
        let mut signal = vec![0.0; total];
        let mut frame = vec![Complex::new(0.0, 0.0); len];

        for (j, column) in mdct_matrix.columns().into_iter().enumerate() {
            for (k, slot) in frame.iter_mut().enumerate() {
                *slot = if k < step {
                    self.inverse_pre[k] * column[k]
                } else {
                    Complex::new(0.0, 0.0)
                };
            }
            self.fft.forward_complex(&mut frame);

            let start = j * step;
            let out = &mut signal[start..start + len];
            for (n, sample) in out.iter_mut().enumerate() {
                *sample += 2.0 * (frame[n] * self.inverse_post[n]).re * self.window[n];
            }
        }

        if num_frames < 2 {
            return Ok(Vec::new());
        }
        Ok(signal[step..total - step].to_vec())
    }
}

/// Forward MDCT of `signal` with `window` (see [`Mdct::forward`]).
pub fn mdct(signal: &[f64], window: &[f64]) -> Result<RealMatrix> {
    Ok(Mdct::new(window)?.forward(signal))
}

/// Inverse MDCT of `mdct_matrix` with `window` (see [`Mdct::inverse`]).
///
/// The window must be twice as long as the matrix has rows.
pub fn imdct(mdct_matrix: &RealMatrix, window: &[f64]) -> Result<Vec<f64>> {
    if window.len() != 2 * mdct_matrix.nrows() {
        return Err(Error::shape(
            "window length vs twice the mdct rows",
            2 * mdct_matrix.nrows(),
            window.len(),
        ));
    }
    Mdct::new(window)?.inverse(mdct_matrix)
}
