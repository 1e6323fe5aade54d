//! Error types for extraction, decoding and encoding.
//!
//! Navigation and mutation never produce an [`Error`]: a missing key or an
//! out-of-range index yields a null [`Node`](crate::Node), and the failure
//! surfaces later as [`Error::TypeMismatch`] when a typed extractor is called.

use thiserror::Error;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The node's value is not of the requested shape.
    #[error("type assertion to {expected} failed: value is {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A numeric value of the right shape does not fit the target type.
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML mapping key that cannot be represented as a string.
    #[error("unsupported mapping key of kind {0}")]
    UnsupportedKey(&'static str),

    #[error("invalid !!binary payload: {0}")]
    Binary(#[from] base64::DecodeError),

    #[error("cannot encode non-finite float {0} as JSON")]
    NonFiniteFloat(f64),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for errors caused by the shape of the data rather than by
    /// decoding, encoding or I/O.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. } | Error::OutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let err = Error::TypeMismatch {
            expected: "bool",
            found: "int",
        };
        assert_eq!(err.to_string(), "type assertion to bool failed: value is int");
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_io_is_not_type_mismatch() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(!err.is_type_mismatch());
        assert_eq!(err.to_string(), "boom");
    }
}
