//! Device operations
//!
//! An operation drives one device through a sequence of phases. Each call to
//! [`Operation::poll`] performs exactly one request/response exchange on the
//! link and advances to the next phase. The poller owns the retry policy:
//! a communication error leaves the operation on the same phase.

use std::fmt;

use async_trait::async_trait;
use ess_comlink::{ComLinkError, CommLink};

/// Build a list of convertibles to query from mutable places
macro_rules! objects {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        vec![&mut $first as &mut dyn ::ess_mib::EssConvertible $(, &mut $rest)*]
    };
}

pub mod ess;
pub mod settings;
pub mod status;

pub use ess::{query_many, OpEss, QueryOutcome};
pub use settings::{OpQueryEssSettings, SettingsPhase};
pub use status::{Fallbacks, OpQueryEssStatus, StatusPhase};

/// Queue priority, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityLevel {
    Urgent,
    Command,
    Settings,
    DeviceData,
    PollHigh,
    PollLow,
    Idle,
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriorityLevel::Urgent => "urgent",
            PriorityLevel::Command => "command",
            PriorityLevel::Settings => "settings",
            PriorityLevel::DeviceData => "device_data",
            PriorityLevel::PollHigh => "poll_high",
            PriorityLevel::PollLow => "poll_low",
            PriorityLevel::Idle => "idle",
        };
        f.write_str(s)
    }
}

/// Result of one successful phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// More phases remain
    Continue,
    /// The last phase completed
    Done,
}

/// Identity used to merge duplicate queued operations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpKey {
    pub name: String,
    pub device: String,
}

/// A multi-phase operation on one device
#[async_trait]
pub trait Operation: Send {
    fn name(&self) -> &str;

    /// Device the operation talks to
    fn device(&self) -> &str;

    fn priority(&self) -> PriorityLevel;

    /// Raise (never lower) the priority
    fn raise_priority(&mut self, priority: PriorityLevel);

    /// Communication errors tolerated before the operation fails
    fn retry_threshold(&self) -> u32;

    /// Current phase, for logs
    fn phase_name(&self) -> String;

    /// Run the current phase: one exchange on the link
    async fn poll(&mut self, link: &mut CommLink) -> Result<PollStatus, ComLinkError>;

    /// Record a communication error against the device
    fn handle_comm_error(&mut self, err: &ComLinkError);

    /// Called exactly once when the operation ends
    fn cleanup(&mut self, success: bool);

    fn key(&self) -> OpKey {
        OpKey {
            name: self.name().to_string(),
            device: self.device().to_string(),
        }
    }
}
