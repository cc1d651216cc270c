//! Error types for cdatypes
//!
//! This module defines all error types used throughout the library.

use std::fmt;
use thiserror::Error;

/// Result type alias using cdatypes Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cdatypes operations
#[derive(Error, Debug)]
pub enum Error {
    /// Datatype or narrative validation error
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Value error (invalid value for a type)
    #[error("value error: {0}")]
    Value(String),

    /// Encoding error (data to XML conversion)
    #[error("encoding error: {0}")]
    Encode(String),

    /// Decoding error (XML to data conversion)
    #[error("decoding error: {0}")]
    Decode(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Validation error with context
///
/// Carries the location of the failure inside the value tree (a
/// slash-joined path), the field that failed, and the reason.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Error message
    pub message: String,
    /// Path to the value that failed validation
    pub path: Option<String>,
    /// Field (attribute or element name) that caused the error
    pub field: Option<String>,
    /// Underlying reason
    pub reason: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            field: None,
            reason: None,
        }
    }

    /// Set the path where validation failed
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the field that caused the error
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref reason) = self.reason {
            write!(f, " ({})", reason)?;
        }

        if let Some(ref field) = self.field {
            write!(f, " [field: {}]", field)?;
        }

        if let Some(ref path) = self.path {
            write!(f, " at {}", path)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("value does not match pattern for uid")
            .with_reason("got 'not-an-oid'")
            .with_field("root")
            .with_path("id");

        let msg = format!("{}", err);
        assert!(msg.contains("value does not match pattern for uid"));
        assert!(msg.contains("got 'not-an-oid'"));
        assert!(msg.contains("[field: root]"));
        assert!(msg.contains("at id"));
    }

    #[test]
    fn test_error_conversion() {
        let val_err = ValidationError::new("test");
        let err: Error = val_err.into();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_display_without_context() {
        let err = ValidationError::new("plain message");
        assert_eq!(format!("{}", err), "plain message");
    }
}
