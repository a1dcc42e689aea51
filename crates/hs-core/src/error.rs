//! Error types for hmf2smf

use thiserror::Error;

/// hmf2smf error type
#[derive(Error, Debug)]
pub enum Error {
    /// Unrecognized initial mass function name
    #[error("Unknown initial mass function '{0}' (supported: salpeter, kroupa)")]
    InvalidImfName(String),

    /// A required argument was not supplied
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    /// Two array-valued inputs have different lengths
    #[error("Shape mismatch: array of length {left} cannot be combined with array of length {right}")]
    ShapeMismatch {
        /// Length of the left-hand operand
        left: usize,
        /// Length of the right-hand operand
        right: usize,
    },

    /// Unrecognized cosmology preset name
    #[error("Unknown cosmology '{0}'")]
    UnknownCosmology(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let e = Error::InvalidImfName("topheavy".into());
        assert!(e.to_string().contains("topheavy"));

        let e = Error::MissingArgument("imf");
        assert_eq!(e.to_string(), "Missing required argument: imf");

        let e = Error::ShapeMismatch { left: 3, right: 2 };
        assert!(e.to_string().contains("length 3"));
        assert!(e.to_string().contains("length 2"));
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<f64>("not json").unwrap_err();
        let e: Error = err.into();
        assert!(matches!(e, Error::Json(_)));
    }
}
