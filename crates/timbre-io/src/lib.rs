//! WAV input/output for the timbre toolkit.
//!
//! This crate provides:
//!
//! - **Mono analysis input**: [`read_wav`] loads any PCM or float WAV file as
//!   `f64` samples in `[-1, 1]`, averaging channels
//! - **Multichannel input**: [`read_wav_channels`] keeps channels apart as a
//!   `[samples, channels]` matrix
//! - **Output**: [`write_wav`] and [`write_wav_channels`] for resynthesized signals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use timbre_io::{read_wav, write_wav};
//!
//! let (samples, spec) = read_wav("input.wav")?;
//! println!("{} samples at {} Hz", samples.len(), spec.sample_rate);
//! write_wav("copy.wav", &samples, spec.mono())?;
//! ```

mod wav;

pub use wav::{
    WavFormat, WavInfo, WavSpec, read_wav, read_wav_channels, read_wav_info, write_wav,
    write_wav_channels,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file's sample format cannot be represented.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
