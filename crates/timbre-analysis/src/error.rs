//! Error types for transform operations.

use thiserror::Error;

/// Errors returned by the transform engine.
///
/// Every operation is stateless, so an error never leaves anything behind to
/// clean up: the call simply did not produce an output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Two inputs that must agree on a dimension do not.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which pairing failed (e.g. "filterbank columns vs spectrum bins").
        context: &'static str,
        /// The size implied by the other operand.
        expected: usize,
        /// The size actually supplied.
        actual: usize,
    },

    /// A scalar parameter is outside the domain the transform is defined on.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the public signature.
        name: &'static str,
        /// Description of the violated requirement.
        reason: String,
    },

    /// Parameters are individually valid but jointly make the result undefined.
    #[error("degenerate parameters: {0}")]
    DegenerateParameter(String),
}

impl Error {
    /// Create an invalid parameter error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error.
    pub fn shape(context: &'static str, expected: usize, actual: usize) -> Self {
        Error::ShapeMismatch {
            context,
            expected,
            actual,
        }
    }
}

/// Convenience result type for transform operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_display() {
        let err = Error::shape("filterbank columns", 512, 256);
        assert_eq!(
            err.to_string(),
            "shape mismatch in filterbank columns: expected 512, got 256"
        );
    }

    #[test]
    fn invalid_parameter_display() {
        let err = Error::invalid("step", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'step': must be greater than zero"
        );
    }

    #[test]
    fn degenerate_display() {
        let err = Error::DegenerateParameter("zero overlap-add gain".to_string());
        assert!(err.to_string().contains("zero overlap-add gain"));
    }
}
