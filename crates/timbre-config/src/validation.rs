//! Analysis profile validation.
//!
//! Every check runs and every violation is reported, so a hand-edited profile
//! can be fixed in one pass.
//!
//! # Example
//!
//! ```rust
//! use timbre_config::{AnalysisConfig, validate_config};
//!
//! let mut config = AnalysisConfig::default();
//! config.mel.filters = 0;
//! config.mdct.window_length = 1000;
//! assert!(validate_config(&config).is_err());
//! ```

use crate::config::AnalysisConfig;
use thiserror::Error;
use timbre_analysis::Window;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric setting outside its allowed range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted setting name, e.g. `stft.overlap`.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Length that must be a power of two.
    #[error("parameter '{param}' value {value} is not a power of two")]
    NotPowerOfTwo {
        /// Dotted setting name.
        param: String,
        /// The offending length.
        value: usize,
    },

    /// Window name that does not parse.
    #[error("unknown window '{name}' for '{param}'")]
    UnknownWindow {
        /// Dotted setting name.
        param: String,
        /// The unrecognized window name.
        name: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", join_errors(.0))]
    Multiple(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Collects violations while walking a config.
#[derive(Default)]
struct Checker {
    errors: Vec<ValidationError>,
}

impl Checker {
    fn range(&mut self, param: &str, value: f64, min: f64, max: f64) {
        if !(value >= min && value <= max) {
            self.errors.push(ValidationError::OutOfRange {
                param: param.to_string(),
                value,
                min,
                max,
            });
        }
    }

    fn count(&mut self, param: &str, value: usize, min: usize, max: usize) {
        self.range(param, value as f64, min as f64, max as f64);
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.errors)),
        }
    }
}

/// Validate every section of an analysis profile.
///
/// A single violation is returned as itself, several as
/// [`ValidationError::Multiple`].
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    let mut check = Checker::default();

    let stft = &config.stft;
    if stft.window.parse::<Window>().is_err() {
        check.errors.push(ValidationError::UnknownWindow {
            param: "stft.window".to_string(),
            name: stft.window.clone(),
        });
    }
    check.range("stft.window_duration", stft.window_duration, 0.001, 10.0);
    check.range("stft.overlap", stft.overlap, 0.0, 0.95);

    let mel = &config.mel;
    check.count("mel.filters", mel.filters, 1, 1024);
    // mfcc drops the 0th coefficient, so at most filters - 1 remain
    let max_coefficients = mel.filters.saturating_sub(1).max(1);
    check.count("mel.coefficients", mel.coefficients, 1, max_coefficients);

    let cqt = &config.cqt;
    check.count("cqt.octave_resolution", cqt.octave_resolution, 1, 96);
    check.range("cqt.min_frequency", cqt.min_frequency, 1.0, 20000.0);
    // at least one channel must fit between the bounds
    let resolution = cqt.octave_resolution.max(1) as f64;
    let lowest_max = cqt.min_frequency * 2f64.powf(1.0 / resolution);
    check.range("cqt.max_frequency", cqt.max_frequency, lowest_max, 96000.0);
    check.range("cqt.frames_per_second", cqt.frames_per_second, 0.1, 1000.0);

    let mdct = &config.mdct;
    if !mdct.window_length.is_power_of_two() || mdct.window_length < 4 {
        check.errors.push(ValidationError::NotPowerOfTwo {
            param: "mdct.window_length".to_string(),
            value: mdct.window_length,
        });
    }
    check.range("mdct.kbd_alpha", mdct.kbd_alpha, 0.0, 20.0);

    check.finish()
}

/// Validate a window name for a setting.
pub fn validate_window(param: &str, name: &str) -> ValidationResult<Window> {
    name.parse::<Window>().map_err(|_| ValidationError::UnknownWindow {
        param: param.to_string(),
        name: name.to_string(),
    })
}
