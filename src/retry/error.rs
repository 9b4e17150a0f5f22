use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Boxed error type carried as the source of a [`NormalizedError`]
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

const UNKNOWN_ERROR: &str = "Unknown error";

/// A failure raised by an operation, reduced to a message and an optional source
///
/// Structured errors keep their `Display` text as the message. Anything that is
/// not an error value (a panic payload) becomes the fixed message `"Unknown error"`.
#[derive(Debug)]
pub struct NormalizedError {
    message: String,
    source: Option<BoxError>,
}

impl NormalizedError {
    /// Wraps a structured error, preserving its message
    pub fn from_error<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source = error.into();
        Self {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// The placeholder used for values that are not errors
    pub fn unknown() -> Self {
        Self {
            message: UNKNOWN_ERROR.to_string(),
            source: None,
        }
    }

    /// Normalizes the payload of a caught panic
    ///
    /// Panic payloads are never structured errors, so the payload is dropped.
    pub(crate) fn from_panic(_payload: Box<dyn Any + Send>) -> Self {
        Self::unknown()
    }

    /// The human readable message of the failure
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The original error, when the failure was a structured error
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Whether this error stands in for a non-error value
    pub fn is_unknown(&self) -> bool {
        self.source.is_none() && self.message == UNKNOWN_ERROR
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Transparent: the wrapped error already supplied the message
impl StdError for NormalizedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().and_then(|e| e.source())
    }
}

/// Errors produced by [`Retry`](super::Retry)
#[derive(Debug, Error)]
pub enum RetryError {
    /// Every permitted attempt failed; carries the error of the final attempt
    #[error("retry exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of invocations performed
        attempts: u32,
        /// Normalized error from the last attempt
        #[source]
        last: NormalizedError,
    },

    /// The effective policy violates its constraints
    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(String),

    /// The attempt loop ended with neither a value nor a recorded failure
    #[error("Unexpected error occurred")]
    Internal,
}

impl RetryError {
    /// The message a caller would show for this failure
    pub fn message(&self) -> String {
        match self {
            Self::Exhausted { last, .. } => last.message().to_string(),
            other => other.to_string(),
        }
    }

    /// Number of invocations performed before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
            Self::InvalidPolicy(_) | Self::Internal => 0,
        }
    }

    /// The last normalized operation error, if the budget was exhausted
    pub fn last_error(&self) -> Option<&NormalizedError> {
        match self {
            Self::Exhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_from_error_preserves_message() {
        let error = NormalizedError::from_error(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(error.message(), "boom");
        assert_eq!(error.to_string(), "boom");
        assert!(error.inner().is_some());
        assert!(!error.is_unknown());
    }

    #[test]
    fn test_from_string_error() {
        let error = NormalizedError::from_error("connection refused");
        assert_eq!(error.message(), "connection refused");
    }

    #[test]
    fn test_panic_payload_is_unknown() {
        let error = NormalizedError::from_panic(Box::new("oops"));
        assert_eq!(error.message(), "Unknown error");
        assert!(error.is_unknown());
    }

    #[test]
    fn test_exhausted_message() {
        let error = RetryError::Exhausted {
            attempts: 2,
            last: NormalizedError::from_error("boom"),
        };
        assert_eq!(error.message(), "boom");
        assert_eq!(error.to_string(), "retry exhausted after 2 attempts");
        assert_eq!(error.source().unwrap().to_string(), "boom");
        assert_eq!(error.attempts(), 2);
        assert!(error.last_error().is_some());
    }

    #[test]
    fn test_internal_message() {
        assert_eq!(RetryError::Internal.message(), "Unexpected error occurred");
        assert!(RetryError::Internal.last_error().is_none());
    }
}
