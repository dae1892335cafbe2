//! Command-line interface

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ess_comlink::CommLink;
use tokio_util::sync::CancellationToken;

use crate::config::EssConfig;
use crate::device::{Controller, WeatherSensor, DEFAULT_FAIL_THRESHOLD};
use crate::error::Result;
use crate::operation::{OpQueryEssSettings, OpQueryEssStatus, PriorityLevel};
use crate::poller::{LinkPoller, RetryPolicy};
use crate::simulator::{EssSimulator, SimProfile};

/// Default configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/essrv.yaml";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "essrv",
    version = env!("CARGO_PKG_VERSION"),
    about = "Environmental sensor station polling service",
    long_about = None
)]
pub struct Args {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short = 'c', long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true, env = "ESSRV_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Poll every configured sensor until interrupted
    Run,
    /// Validate the configuration and exit
    Validate,
    /// Query a simulated station once and print its settings and sample
    Sample {
        /// Simulator profile (ntcip_v1, ntcip_v2, ntcip_v4, high_sierra)
        #[arg(short = 'p', long, default_value = "ntcip_v4")]
        profile: String,

        /// System description to report instead of the profile's
        #[arg(short = 'f', long)]
        fingerprint: Option<String>,
    },
}

/// Settings and sample documents of one simulated station
#[derive(Debug, Clone, Default)]
pub struct SampleOutput {
    pub settings: Option<String>,
    pub sample: Option<String>,
}

/// Run one settings and one status operation against the simulator
pub async fn sample(profile: SimProfile, fingerprint: Option<String>) -> Result<SampleOutput> {
    let sys_descr = fingerprint.unwrap_or_else(|| profile.sys_descr().to_string());
    let sensor = WeatherSensor::new("sample", Some(sys_descr), None).into_shared();
    let controller = Arc::new(Controller::new("sample", "simulator", DEFAULT_FAIL_THRESHOLD));

    let link = CommLink::new(
        "simulator",
        Box::new(EssSimulator::with_profile(profile)),
        Duration::from_secs(1),
    );
    let (poller, handle) = LinkPoller::new(link, RetryPolicy::immediate(), CancellationToken::new());
    handle.add_operation(Box::new(OpQueryEssSettings::new(
        Arc::clone(&sensor),
        Arc::clone(&controller),
        PriorityLevel::Settings,
        0,
    )))?;
    handle.add_operation(Box::new(OpQueryEssStatus::new(
        Arc::clone(&sensor),
        Arc::clone(&controller),
        PriorityLevel::PollLow,
        0,
    )))?;
    // The worker exits once the queue is empty and no handle remains
    drop(handle);
    poller.run().await;

    let sensor = sensor.read();
    Ok(SampleOutput {
        settings: sensor.settings().map(str::to_string),
        sample: sensor.sample().map(str::to_string),
    })
}

/// One-line description of a validated configuration
pub fn summary(config: &EssConfig) -> String {
    config
        .links
        .iter()
        .map(|link| {
            format!(
                "{} ({} sensor(s), timeout {} ms)",
                link.name,
                config.sensors_on(&link.name).count(),
                link.timeout_ms
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
