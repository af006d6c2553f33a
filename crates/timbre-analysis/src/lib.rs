//! Timbre Analysis - Time-frequency transforms for audio signals
//!
//! This crate turns sampled audio into time-frequency representations and
//! back:
//!
//! - [`spectrogram`] - Short-time Fourier transform and overlap-add inverse
//! - [`mel`] - Mel filterbank, mel spectrogram and MFCC
//! - [`constant_q`] - Constant-Q kernel, CQT spectrogram and chromagram
//! - [`trig`] - Orthonormal DCT and DST, types I–IV
//! - [`mdct`] - Modified discrete cosine transform with TDAC reconstruction
//! - [`fft`] - FFT wrapper and window functions
//! - [`sparse`] - Compressed-row matrix for filterbanks and kernels
//! - [`export`] - Axis helpers and CSV export
//!
//! Every transform is a pure function of its inputs. Matrices are
//! [`ndarray::Array2`] indexed `[frequency, frame]`, and all arithmetic is
//! `f64`.
//!
//! ## Cargo features
//!
//! - `parallel` - Spread per-frame analysis and per-channel kernel
//!   construction across threads with rayon. Results are identical.
//! - `tracing` - Emit `debug` events with frame counts, padding and kernel
//!   density.
//!
//! ## Example
//!
//! ```rust
//! use timbre_analysis::{Window, stft, istft};
//!
//! let signal: Vec<f64> = (0..4000).map(|i| (i as f64 * 0.05).sin()).collect();
//! let window = Window::Hann.coefficients(256);
//!
//! let spec = stft(&signal, &window, 128).unwrap();
//! let back = istft(&spec, &window, 128).unwrap();
//! assert!((back[1000] - signal[1000]).abs() < 1e-9);
//! ```
//!
//! ## MFCC
//!
//! ```rust
//! use timbre_analysis::{MelFilterBank, Window, mfcc};
//!
//! let sample_rate = 16000.0;
//! let signal = vec![0.0; 16000];
//! let window = Window::Hamming.coefficients(512);
//! let filterbank = MelFilterBank::build(sample_rate, 512, 40).unwrap();
//!
//! let coeffs = mfcc(&signal, &window, 256, &filterbank, 20).unwrap();
//! assert_eq!(coeffs.nrows(), 20);
//! ```

pub mod constant_q;
pub mod error;
pub mod export;
pub mod fft;
pub mod matrix;
pub mod mdct;
pub mod mel;
mod par;
pub mod sparse;
pub mod spectrogram;
pub mod trig;

// Re-export main types
pub use constant_q::{CqtKernel, SPARSITY_THRESHOLD, cqt_chromagram, cqt_spectrogram, fold_chroma};
pub use error::{Error, Result};
pub use fft::{Fft, Window, kbd_window};
pub use matrix::{ComplexMatrix, RealMatrix};
pub use mdct::{Mdct, imdct, is_princen_bradley, mdct};
pub use mel::{MelFilterBank, hz_to_mel, mel_to_hz, melspectrogram, mfcc};
pub use sparse::SparseMatrix;
pub use spectrogram::{Stft, frame_count, istft, stft};
pub use trig::{TrigKind, TrigTransform, TrigType, dct, dst};
