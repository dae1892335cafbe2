//! Environmental sensor station polling service
//!
//! Polls NTCIP 1204 weather stations over communication links. Each link is
//! owned by one [`poller::LinkPoller`] that runs [`operation`]s one at a time;
//! a settings or status operation walks its phase graph, collects an
//! [`ess_mib::EssRec`] and commits it to the station's
//! [`device::WeatherSensor`].

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod operation;
pub mod poller;
pub mod service;
pub mod simulator;

pub use config::EssConfig;
pub use error::{EssrvError, Result};
pub use service::EssService;
