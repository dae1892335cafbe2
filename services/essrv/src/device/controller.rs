//! Field controller health
//!
//! Tracks communication events and consecutive failed operations for one
//! controller. A controller that keeps failing is marked failed, which makes
//! later operations give up on their first communication error.

use std::fmt;

use ess_comlink::ComLinkError;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

/// Default consecutive failures before a controller is marked failed
pub const DEFAULT_FAIL_THRESHOLD: u32 = 3;

/// Kind of communication event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommEvent {
    Timeout,
    Checksum,
    Parsing,
    Other,
}

impl From<&ComLinkError> for CommEvent {
    fn from(err: &ComLinkError) -> Self {
        match err {
            ComLinkError::Timeout(_) => CommEvent::Timeout,
            ComLinkError::Checksum(_) => CommEvent::Checksum,
            ComLinkError::MalformedFrame(_) => CommEvent::Parsing,
            ComLinkError::Io(_) | ComLinkError::NotConnected | ComLinkError::NoSuchName { .. } => {
                CommEvent::Other
            },
        }
    }
}

impl fmt::Display for CommEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommEvent::Timeout => "timeout",
            CommEvent::Checksum => "checksum",
            CommEvent::Parsing => "parsing",
            CommEvent::Other => "other",
        };
        f.write_str(s)
    }
}

/// Snapshot of a controller's health counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControllerHealth {
    pub timeout_errors: u64,
    pub checksum_errors: u64,
    pub parsing_errors: u64,
    pub other_errors: u64,
    pub completed_operations: u64,
    pub failed_operations: u64,
    pub consecutive_failures: u32,
    pub failed: bool,
    pub error_status: Option<String>,
}

impl ControllerHealth {
    pub fn comm_errors(&self) -> u64 {
        self.timeout_errors + self.checksum_errors + self.parsing_errors + self.other_errors
    }
}

/// A field controller on a communication link
#[derive(Debug)]
pub struct Controller {
    name: String,
    link: String,
    fail_threshold: u32,
    health: Mutex<ControllerHealth>,
}

impl Controller {
    pub fn new(name: impl Into<String>, link: impl Into<String>, fail_threshold: u32) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            fail_threshold: fail_threshold.max(1),
            health: Mutex::new(ControllerHealth::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn is_failed(&self) -> bool {
        self.health.lock().failed
    }

    pub fn error_status(&self) -> Option<String> {
        self.health.lock().error_status.clone()
    }

    pub fn health(&self) -> ControllerHealth {
        self.health.lock().clone()
    }

    /// Record one communication event
    pub fn log_comm_event(&self, event: CommEvent, op_name: &str, detail: &str) {
        let mut health = self.health.lock();
        match event {
            CommEvent::Timeout => health.timeout_errors += 1,
            CommEvent::Checksum => health.checksum_errors += 1,
            CommEvent::Parsing => health.parsing_errors += 1,
            CommEvent::Other => health.other_errors += 1,
        }
        warn!("{}: {} {} error: {}", self.name, op_name, event, detail);
    }

    /// Record the outcome of an operation
    pub fn complete_operation(&self, op_name: &str, success: bool) {
        let mut health = self.health.lock();
        if success {
            health.completed_operations += 1;
            health.consecutive_failures = 0;
            if health.failed {
                info!("{}: communication restored by {}", self.name, op_name);
            }
            health.failed = false;
            health.error_status = None;
        } else {
            health.failed_operations += 1;
            health.consecutive_failures = health.consecutive_failures.saturating_add(1);
            health.error_status = Some(format!("{} failed", op_name));
            if !health.failed && health.consecutive_failures >= self.fail_threshold {
                health.failed = true;
                warn!(
                    "{}: marked failed after {} consecutive failed operations",
                    self.name, health.consecutive_failures
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ess_comlink::ObjectId;

    #[test]
    fn test_event_kinds() {
        assert_eq!(
            CommEvent::from(&ComLinkError::timeout("t")),
            CommEvent::Timeout
        );
        assert_eq!(
            CommEvent::from(&ComLinkError::malformed("m")),
            CommEvent::Parsing
        );
        assert_eq!(
            CommEvent::from(&ComLinkError::no_such_name(ObjectId::from_slice(&[1, 3]))),
            CommEvent::Other
        );
    }

    #[test]
    fn test_counts_events() {
        let ctl = Controller::new("ctl", "rwis", DEFAULT_FAIL_THRESHOLD);
        ctl.log_comm_event(CommEvent::Timeout, "query_ess_status", "no response");
        ctl.log_comm_event(CommEvent::Timeout, "query_ess_status", "no response");
        ctl.log_comm_event(CommEvent::Checksum, "query_ess_status", "bad crc");
        let health = ctl.health();
        assert_eq!(health.timeout_errors, 2);
        assert_eq!(health.checksum_errors, 1);
        assert_eq!(health.comm_errors(), 3);
    }

    #[test]
    fn test_marked_failed_after_threshold() {
        let ctl = Controller::new("ctl", "rwis", 3);
        ctl.complete_operation("query_ess_status", false);
        ctl.complete_operation("query_ess_status", false);
        assert!(!ctl.is_failed());
        ctl.complete_operation("query_ess_status", false);
        assert!(ctl.is_failed());
        assert_eq!(ctl.error_status().as_deref(), Some("query_ess_status failed"));

        ctl.complete_operation("query_ess_settings", true);
        assert!(!ctl.is_failed());
        assert_eq!(ctl.error_status(), None);
        assert_eq!(ctl.health().consecutive_failures, 0);
    }
}
