use thiserror::Error;

/// Result type for object model operations
pub type Result<T> = std::result::Result<T, MibError>;

/// Object model errors
///
/// Out-of-range and missing raw values are not errors; they decode to `None`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MibError {
    /// Numeric operation requested on a non-numeric object
    #[error("{operation} is not supported for {name}")]
    Unsupported {
        name: &'static str,
        operation: &'static str,
    },

    /// Wire value of the wrong kind for the object
    #[error("Type mismatch for {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: String,
    },

    /// Diagnostic serialization failure
    #[error("JSON error: {0}")]
    Json(String),
}

impl MibError {
    pub fn unsupported(name: &'static str, operation: &'static str) -> Self {
        MibError::Unsupported { name, operation }
    }

    pub fn json(msg: impl Into<String>) -> Self {
        MibError::Json(msg.into())
    }
}

impl From<serde_json::Error> for MibError {
    fn from(err: serde_json::Error) -> Self {
        MibError::Json(err.to_string())
    }
}
