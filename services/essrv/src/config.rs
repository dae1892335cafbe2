//! Service configuration
//!
//! Loaded in layers by [`common::config_loader::load_layered`]: struct
//! defaults, then the YAML/TOML/JSON file, then `ESSRV_` environment
//! variables (`ESSRV_SERVICE__NAME`, `ESSRV_LOGGING__LEVEL`, ...).

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use common::logging::LogConfig;
use serde::{Deserialize, Serialize};

use crate::error::{EssrvError, Result};
use crate::poller::RetryPolicy;
use crate::simulator::SimProfile;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "ESSRV_";

/// Default status poll period
pub const DEFAULT_POLL_PERIOD_SECS: u64 = 60;

/// Default settings refresh period
pub const DEFAULT_SETTINGS_PERIOD_SECS: u64 = 3600;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EssConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub logging: LogConfig,

    /// Communication links, one poller each
    #[serde(default)]
    pub links: Vec<LinkConfig>,

    /// Weather sensors polled over the links
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

/// Service identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,

    /// Consecutive failed operations before a controller is marked failed
    #[serde(default = "default_fail_threshold")]
    pub fail_threshold: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "essrv".to_string(),
            fail_threshold: default_fail_threshold(),
        }
    }
}

fn default_fail_threshold() -> u32 {
    3
}

/// One communication link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub name: String,

    /// Per-exchange timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Comm errors an operation may hit before it fails
    #[serde(default = "default_retry_threshold")]
    pub retry_threshold: u32,

    #[serde(default)]
    pub retry: RetryConfig,

    pub transport: TransportConfig,
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_retry_threshold() -> u32 {
    3
}

impl LinkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Backoff between retries of a failed phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: default_jitter(),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        RetryPolicy::from_config(
            config.initial_delay_ms,
            config.max_delay_ms,
            config.backoff_multiplier,
            config.jitter,
        )
    }
}

/// Transport behind a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportConfig {
    /// In-memory device answering from a named profile
    Simulated { profile: String },
}

/// One weather sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub name: String,

    /// Link the sensor's controller is attached to
    pub link: String,

    /// Controller system description (vendor fingerprint)
    #[serde(default)]
    pub sys_descr: Option<String>,

    /// Controller software model, e.g. "LX-RPU Elite"
    #[serde(default)]
    pub software_model: Option<String>,

    #[serde(default = "default_poll_period")]
    pub poll_period_secs: u64,

    #[serde(default = "default_settings_period")]
    pub settings_period_secs: u64,

    /// Losing one cycle is acceptable: retry without limit
    #[serde(default)]
    pub continuous: bool,
}

fn default_poll_period() -> u64 {
    DEFAULT_POLL_PERIOD_SECS
}

fn default_settings_period() -> u64 {
    DEFAULT_SETTINGS_PERIOD_SECS
}

impl SensorConfig {
    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_period_secs)
    }

    pub fn settings_period(&self) -> Duration {
        Duration::from_secs(self.settings_period_secs)
    }
}

impl EssConfig {
    /// Load from an optional file plus `ESSRV_` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: EssConfig = common::config_loader::load_layered(path, ENV_PREFIX)?;
        Ok(config)
    }

    pub fn link(&self, name: &str) -> Option<&LinkConfig> {
        self.links.iter().find(|l| l.name == name)
    }

    pub fn sensors_on<'a>(&'a self, link: &'a str) -> impl Iterator<Item = &'a SensorConfig> {
        self.sensors.iter().filter(move |s| s.link == link)
    }

    /// Reject configurations the service cannot run
    pub fn validate(&self) -> Result<()> {
        let mut links = HashSet::new();
        for link in &self.links {
            if !links.insert(link.name.as_str()) {
                return Err(EssrvError::config(format!("duplicate link '{}'", link.name)));
            }
            if link.timeout_ms == 0 {
                return Err(EssrvError::config(format!(
                    "link '{}': timeout_ms must be greater than 0",
                    link.name
                )));
            }
            if link.retry.backoff_multiplier < 1.0 {
                return Err(EssrvError::config(format!(
                    "link '{}': backoff_multiplier must be at least 1.0",
                    link.name
                )));
            }
            match &link.transport {
                TransportConfig::Simulated { profile } => {
                    profile.parse::<SimProfile>().map_err(|e| {
                        EssrvError::config(format!("link '{}': {}", link.name, e))
                    })?;
                },
            }
        }

        let mut sensors = HashSet::new();
        for sensor in &self.sensors {
            if !sensors.insert(sensor.name.as_str()) {
                return Err(EssrvError::config(format!(
                    "duplicate sensor '{}'",
                    sensor.name
                )));
            }
            if !links.contains(sensor.link.as_str()) {
                return Err(EssrvError::config(format!(
                    "sensor '{}' uses unknown link '{}'",
                    sensor.name, sensor.link
                )));
            }
            if sensor.poll_period_secs == 0 || sensor.settings_period_secs == 0 {
                return Err(EssrvError::config(format!(
                    "sensor '{}': poll periods must be greater than 0",
                    sensor.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn parse(yaml: &str) -> EssConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    const SAMPLE: &str = r#"
links:
  - name: rwis
    transport:
      kind: simulated
      profile: ntcip_v2
sensors:
  - name: ess_t35
    link: rwis
"#;

    #[test]
    fn test_defaults_applied() {
        let config = parse(SAMPLE);
        let link = &config.links[0];
        assert_eq!(link.timeout(), Duration::from_millis(2000));
        assert_eq!(link.retry_threshold, 3);
        assert_eq!(
            link.transport,
            TransportConfig::Simulated {
                profile: "ntcip_v2".to_string()
            }
        );
        let sensor = &config.sensors[0];
        assert_eq!(sensor.poll_period_secs, DEFAULT_POLL_PERIOD_SECS);
        assert_eq!(sensor.settings_period_secs, DEFAULT_SETTINGS_PERIOD_SECS);
        assert!(!sensor.continuous);
        assert_eq!(config.service.fail_threshold, 3);
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_link_rejected() {
        let mut config = parse(SAMPLE);
        config.sensors[0].link = "missing".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown link"));
    }

    #[test]
    fn test_duplicate_sensor_rejected() {
        let mut config = parse(SAMPLE);
        let dup = config.sensors[0].clone();
        config.sensors.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = parse(SAMPLE);
        config.links[0].timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let mut config = parse(SAMPLE);
        config.links[0].transport = TransportConfig::Simulated {
            profile: "ntcip_v9".to_string(),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ntcip_v9"));
    }

    #[test]
    fn test_sensors_on_link() {
        let config = parse(SAMPLE);
        assert_eq!(config.sensors_on("rwis").count(), 1);
        assert_eq!(config.sensors_on("other").count(), 0);
    }
}
