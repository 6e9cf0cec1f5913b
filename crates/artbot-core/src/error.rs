//! Error handling for ARTBot
//!
//! Provides error types for the shared data layer:
//! - Art errors (malformed pixel encodings)
//! - Status errors (submission state machine)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Art encoding error type
///
/// Raised while adapting a submitted `color -> pixels` encoding into
/// normalized pixel lists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArtError {
    /// A pixel did not contain exactly two integer components
    #[error("Malformed pixel for color {color}: {reason}")]
    MalformedPixel {
        /// The color whose pixel list was malformed.
        color: String,
        /// Why the pixel was rejected.
        reason: String,
    },

    /// The encoding was not a JSON object of colors
    #[error("Art encoding must map colors to pixel lists: {reason}")]
    NotAColorMap {
        /// Why the encoding was rejected.
        reason: String,
    },
}

/// Submission status error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatusError {
    /// The stored status value is not one of the known states
    #[error("Unknown submission status: {value}")]
    Unknown {
        /// The unrecognized value.
        value: String,
    },

    /// Invalid state transition
    #[error("Invalid status transition from {current} to {requested}")]
    InvalidTransition {
        /// The current state name.
        current: String,
        /// The requested state name.
        requested: String,
    },
}

/// Main error type for ARTBot
///
/// A unified error type that can represent any error from the core layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Art encoding error
    #[error(transparent)]
    Art(#[from] ArtError),

    /// Submission status error
    #[error(transparent)]
    Status(#[from] StatusError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_art_error_display() {
        let err = ArtError::MalformedPixel {
            color: "3".to_string(),
            reason: "expected 2 components, got 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed pixel for color 3: expected 2 components, got 3"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = StatusError::InvalidTransition {
            current: "Processed".to_string(),
            requested: "Submitted".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid status transition from Processed to Submitted"
        );

        let err = StatusError::Unknown {
            value: "Printing".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown submission status: Printing");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ArtError::NotAColorMap {
            reason: "array".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Art(_)));
        assert_eq!(err.to_string(), "Art encoding must map colors to pixel lists: array");

        let err: Error = StatusError::Unknown {
            value: "Printing".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Status(_)));
    }
}
