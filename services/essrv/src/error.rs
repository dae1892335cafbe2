//! Error handling for the ESS polling service

use ess_comlink::ComLinkError;
use ess_mib::MibError;
use thiserror::Error;

/// ESS service error type
#[derive(Error, Debug)]
pub enum EssrvError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Communication link errors
    #[error("Communication error: {0}")]
    ComLink(#[from] ComLinkError),

    /// Object decoding or serialization errors
    #[error("Data error: {0}")]
    Mib(#[from] MibError),

    /// Unknown link, sensor or simulator profile
    #[error("Not found: {0}")]
    NotFound(String),

    /// Poller stopped accepting operations
    #[error("Poller closed: {0}")]
    PollerClosed(String),

    /// Logging or configuration loading failures from the common library
    #[error(transparent)]
    Common(#[from] common::Error),
}

/// Result type alias for the ESS service
pub type Result<T> = std::result::Result<T, EssrvError>;

impl EssrvError {
    pub fn config(msg: impl Into<String>) -> Self {
        EssrvError::ConfigError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        EssrvError::NotFound(msg.into())
    }

    pub fn poller_closed(link: impl Into<String>) -> Self {
        EssrvError::PollerClosed(link.into())
    }
}
