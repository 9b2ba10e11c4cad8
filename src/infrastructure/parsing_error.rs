//! Parsing error types for card extraction and field normalization
//!
//! Absent fields are not errors: a missing marker yields `None` and a card
//! without a username is filtered out. Only values that are present but do not
//! fit their expected shape end up here.

use crate::domain::ReviewField;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Malformed value for '{field}': {value:?} - {reason}")]
    MalformedValue {
        field: ReviewField,
        value: String,
        reason: String,
    },

    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid marker for '{field}': tag {tag:?} - {reason}")]
    InvalidMarker {
        field: String,
        tag: String,
        reason: String,
    },
}

impl ParsingError {
    /// Create a malformed value error for a field
    pub fn malformed(field: ReviewField, value: &str, reason: impl Into<String>) -> Self {
        Self::MalformedValue {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid marker error
    pub fn invalid_marker(field: &str, tag: &str, reason: impl Into<String>) -> Self {
        Self::InvalidMarker {
            field: field.to_string(),
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the job may continue past this error by dropping the record
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::MalformedValue { .. } => true,
            Self::InvalidPattern { .. } | Self::InvalidMarker { .. } => false,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_field_and_value() {
        let err = ParsingError::malformed(ReviewField::Rating, "five", "not an integer");
        let message = err.to_string();
        assert!(message.contains("rating"));
        assert!(message.contains("\"five\""));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invalid_marker_is_fatal() {
        let err = ParsingError::invalid_marker("card", "div[", "bad selector");
        assert!(!err.is_recoverable());
    }
}
