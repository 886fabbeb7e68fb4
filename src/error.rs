use thiserror::Error;

/// Errors that abort an extraction call.
///
/// Data-quality findings (duplicate ids, orphaned facts, unknown values) are
/// never reported through this type; they end up in the extraction's
/// diagnostics instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The input DOM violates the input contract (null root, empty tag name,
    /// malformed attribute map, configured size limits exceeded)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A schema configuration could not be loaded
    #[error("Invalid schema configuration: {0}")]
    InvalidSchema(String),

    /// Structured output could not be produced
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractError::InvalidInput("document root is null".to_string());
        assert_eq!(err.to_string(), "Invalid input: document root is null");

        let err = ExtractError::InvalidSchema("empty literal".to_string());
        assert!(err.to_string().contains("empty literal"));
    }
}
