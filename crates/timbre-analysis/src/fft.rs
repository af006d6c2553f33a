//! FFT wrapper with windowing functions

use rustfft::{FftPlanner, num_complex::Complex};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
    /// Blackman-Harris window (better sidelobe suppression)
    BlackmanHarris,
    /// Sine window, `sin(π(n + ½)/N)`. Satisfies the Princen-Bradley condition.
    Sine,
    /// Vorbis power-sine window, `sin(π/2 · sin²(π(n + ½)/N))`.
    Vorbis,
}

impl Window {
    /// Every window, in declaration order.
    pub const ALL: [Window; 7] = [
        Window::Rectangular,
        Window::Hann,
        Window::Hamming,
        Window::Blackman,
        Window::BlackmanHarris,
        Window::Sine,
        Window::Vorbis,
    ];

    /// Lowercase name used in configuration files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Window::Rectangular => "rectangular",
            Window::Hann => "hann",
            Window::Hamming => "hamming",
            Window::Blackman => "blackman",
            Window::BlackmanHarris => "blackman-harris",
            Window::Sine => "sine",
            Window::Vorbis => "vorbis",
        }
    }

    /// Window value at position `i` given the period `n`.
    fn value(&self, i: usize, n: f64) -> f64 {
        let x = 2.0 * PI * i as f64 / n;
        match self {
            Window::Rectangular => 1.0,
            Window::Hann => 0.5 * (1.0 - x.cos()),
            Window::Hamming => 0.54 - 0.46 * x.cos(),
            Window::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
            Window::BlackmanHarris => {
                0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos()
                    - 0.01168 * (3.0 * x).cos()
            }
            Window::Sine => (PI * (i as f64 + 0.5) / n).sin(),
            Window::Vorbis => {
                let s = (PI * (i as f64 + 0.5) / n).sin();
                (0.5 * PI * s * s).sin()
            }
        }
    }

    /// Apply the periodic window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let n = buffer.len() as f64;
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.value(i, n);
        }
    }

    /// Get periodic window coefficients.
    ///
    /// The periodic form (period `size`, not `size - 1`) is the one that
    /// overlap-adds to a constant, so it is what STFT synthesis expects.
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }

    /// Get symmetric window coefficients (period `size - 1`).
    ///
    /// The sine and Vorbis windows are already symmetric and are returned
    /// unchanged.
    pub fn symmetric_coefficients(&self, size: usize) -> Vec<f64> {
        match (self, size) {
            (_, 0) => Vec::new(),
            (_, 1) => vec![1.0],
            (Window::Sine | Window::Vorbis, _) => self.coefficients(size),
            _ => {
                let n = (size - 1) as f64;
                (0..size).map(|i| self.value(i, n)).collect()
            }
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rectangular" | "rect" | "none" | "boxcar" => Ok(Window::Rectangular),
            "hann" | "hanning" => Ok(Window::Hann),
            "hamming" => Ok(Window::Hamming),
            "blackman" => Ok(Window::Blackman),
            "blackman-harris" | "blackmanharris" => Ok(Window::BlackmanHarris),
            "sine" | "sin" => Ok(Window::Sine),
            "vorbis" => Ok(Window::Vorbis),
            _ => Err(format!("unknown window '{s}'")),
        }
    }
}

/// Kaiser-Bessel-derived window of even length `size`, as used by AC-3.
///
/// Built from the cumulative sum of a Kaiser window of length `size/2 + 1`
/// with shape `π·alpha`; satisfies `w[n]² + w[n + size/2]² = 1`.
pub fn kbd_window(size: usize, alpha: f64) -> Vec<f64> {
    let half = size / 2;
    if half == 0 {
        return vec![1.0; size];
    }

    let beta = PI * alpha;
    let denom = bessel_i0(beta);
    let kaiser: Vec<f64> = (0..=half)
        .map(|j| {
            let r = 2.0 * j as f64 / half as f64 - 1.0;
            bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
        })
        .collect();
    let total: f64 = kaiser.iter().sum();

    let mut window = vec![0.0; size];
    let mut running = 0.0;
    for n in 0..half {
        running += kaiser[n];
        let w = (running / total).sqrt();
        window[n] = w;
        window[size - 1 - n] = w;
    }
    window
}

/// Zeroth-order modified Bessel function of the first kind (power series).
fn bessel_i0(x: f64) -> f64 {
    let quarter_sq = x * x / 4.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..200 {
        term *= quarter_sq / (k * k) as f64;
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
    }
    sum
}

/// FFT processor with cached forward and inverse plans
///
/// Holds only the planned algorithms, so it is `Send + Sync` and can be
/// shared by per-frame workers.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    ifft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl fmt::Debug for Fft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self { fft, ifft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Perform forward FFT on complex input (in-place, unnormalized)
    pub fn forward_complex(&self, buffer: &mut [Complex<f64>]) {
        self.fft.process(buffer);
    }

    /// Perform inverse FFT on complex buffer (in-place, scaled by `1/size`)
    pub fn inverse_complex(&self, buffer: &mut [Complex<f64>]) {
        self.ifft.process(buffer);

        let scale = 1.0 / self.size as f64;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}
