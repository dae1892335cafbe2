//! Communication Link Error Types

use thiserror::Error;

use crate::oid::ObjectId;

/// Result type for ess-comlink operations
pub type Result<T> = std::result::Result<T, ComLinkError>;

/// Communication link errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComLinkError {
    /// No response within the exchange timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Frame integrity check failed
    #[error("Checksum error: {0}")]
    Checksum(String),

    /// Response could not be parsed or did not match the request
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// Not connected
    #[error("Not connected")]
    NotConnected,

    /// The device does not implement the requested object
    #[error("No such name: {oid}")]
    NoSuchName { oid: ObjectId },
}

impl From<std::io::Error> for ComLinkError {
    fn from(err: std::io::Error) -> Self {
        ComLinkError::Io(err.to_string())
    }
}

// Helper methods for creating errors
impl ComLinkError {
    pub fn timeout(msg: impl Into<String>) -> Self {
        ComLinkError::Timeout(msg.into())
    }

    pub fn checksum(msg: impl Into<String>) -> Self {
        ComLinkError::Checksum(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        ComLinkError::MalformedFrame(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        ComLinkError::Io(msg.into())
    }

    pub fn no_such_name(oid: ObjectId) -> Self {
        ComLinkError::NoSuchName { oid }
    }

    /// Device answered, but does not support the object
    pub fn is_object_not_supported(&self) -> bool {
        matches!(self, ComLinkError::NoSuchName { .. })
    }

    /// Transport-level failure, eligible for operation retry
    pub fn is_comm_failure(&self) -> bool {
        !self.is_object_not_supported()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_name_is_not_a_comm_failure() {
        let err = ComLinkError::no_such_name(ObjectId::from_slice(&[1, 3, 6, 1]));
        assert!(err.is_object_not_supported());
        assert!(!err.is_comm_failure());
        assert_eq!(err.to_string(), "No such name: 1.3.6.1");
    }

    #[test]
    fn test_comm_failures() {
        assert!(ComLinkError::timeout("2000 ms").is_comm_failure());
        assert!(ComLinkError::checksum("bad crc").is_comm_failure());
        assert!(ComLinkError::malformed("short").is_comm_failure());
        assert!(ComLinkError::NotConnected.is_comm_failure());
        assert!(ComLinkError::io("Connection reset by peer").is_comm_failure());
    }
}
