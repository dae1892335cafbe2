//! Shared pieces of the ESS operations

use std::sync::Arc;

use ess_comlink::{ComLinkError, CommLink, GetRequest};
use ess_mib::EssConvertible;
use tracing::{debug, warn};

use super::PriorityLevel;
use crate::device::{CommEvent, Controller, SharedSensor};

/// Result of querying one batch of objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Values received and loaded
    Ok,
    /// The device does not implement at least one object
    NotSupported,
    /// Nothing to query
    Skipped,
}

/// Query a batch of objects in one exchange
///
/// "No such name" answers become [`QueryOutcome::NotSupported`]; only
/// communication failures are returned as errors. Values that cannot be
/// loaded are logged and left missing.
pub async fn query_many(
    link: &mut CommLink,
    device: &str,
    objects: &mut [&mut dyn EssConvertible],
) -> Result<QueryOutcome, ComLinkError> {
    if objects.is_empty() {
        return Ok(QueryOutcome::Skipped);
    }
    let request = GetRequest::new(objects.iter().map(|o| o.oid()).collect());

    let response = match link.exchange(&request).await {
        Ok(response) => response,
        Err(ComLinkError::NoSuchName { oid }) => {
            debug!("{}: no such name {}", device, oid);
            return Ok(QueryOutcome::NotSupported);
        },
        Err(e) => return Err(e),
    };

    for (object, value) in objects.iter_mut().zip(response.values()) {
        if let Err(e) = object.load(value) {
            warn!("{}: {}", device, e);
        }
    }
    debug!(
        "{}: {}",
        device,
        objects
            .iter()
            .map(|o| o.log_entry())
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(QueryOutcome::Ok)
}

/// State shared by every ESS operation
#[derive(Debug)]
pub struct OpEss {
    device: String,
    sensor: SharedSensor,
    controller: Arc<Controller>,
    priority: PriorityLevel,
    retry_threshold: u32,
}

impl OpEss {
    pub fn new(
        sensor: SharedSensor,
        controller: Arc<Controller>,
        priority: PriorityLevel,
        retry_threshold: u32,
    ) -> Self {
        let device = sensor.read().name().to_string();
        Self {
            device,
            sensor,
            controller,
            priority,
            retry_threshold,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn sensor(&self) -> &SharedSensor {
        &self.sensor
    }

    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    pub fn priority(&self) -> PriorityLevel {
        self.priority
    }

    pub fn raise_priority(&mut self, priority: PriorityLevel) {
        if priority < self.priority {
            self.priority = priority;
        }
    }

    /// A controller already marked failed gets no retries
    pub fn retry_threshold(&self) -> u32 {
        if self.controller.is_failed() {
            0
        } else {
            self.retry_threshold
        }
    }

    pub fn handle_comm_error(&self, op_name: &str, err: &ComLinkError) {
        self.controller
            .log_comm_event(CommEvent::from(err), op_name, &err.to_string());
    }
}
