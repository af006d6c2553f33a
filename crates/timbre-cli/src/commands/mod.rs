//! CLI command implementations.

pub mod common;
pub mod cqt;
pub mod dct;
pub mod info;
pub mod mdct;
pub mod mel;
pub mod profiles;
pub mod resynth;
pub mod spectrogram;
