//! Error types for pgmodel

use thiserror::Error;

/// Result type alias for pgmodel operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for building and running queries
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model schema is incomplete (empty table name or column list)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Clause arguments don't line up with their `?` placeholders
    #[error("Argument error: {0}")]
    Argument(String),

    /// Prepare, bind or execute failed on the database side
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl ModelError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is an argument error
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument(_))
    }

    /// Check if this error came from the database
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// The SQLSTATE code reported by the server, if any.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Query(err) => err.as_db_error().map(|db| db.code().code()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_error_display() {
        let err = ModelError::argument("expected 1 parameter, got 0");
        assert_eq!(err.to_string(), "Argument error: expected 1 parameter, got 0");
        assert!(err.is_argument());
        assert!(!err.is_query());
        assert_eq!(err.sql_state(), None);
    }

    #[test]
    fn decode_error_display() {
        let err = ModelError::decode("created_at", "unsupported type timestamptz");
        assert_eq!(
            err.to_string(),
            "Decode error on column 'created_at': unsupported type timestamptz"
        );
    }
}
