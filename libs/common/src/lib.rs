//! Shared building blocks for the ESS services
//!
//! Logging bootstrap, layered configuration loading, graceful shutdown and the
//! common error type.

pub mod config_loader;
pub mod error;
pub mod logging;
pub mod shutdown;

pub use error::{Error, Result};
