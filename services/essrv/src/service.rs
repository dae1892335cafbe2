//! Service assembly
//!
//! Builds sensors and controllers from the configuration, starts one
//! [`LinkPoller`] per link and a scheduler per sensor that queues the
//! periodic settings and status operations.

use std::sync::Arc;

use ess_comlink::CommLink;
use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{EssConfig, LinkConfig, SensorConfig, TransportConfig};
use crate::device::{Controller, SensorRegistry, SharedSensor, WeatherSensor};
use crate::error::{EssrvError, Result};
use crate::operation::{OpQueryEssSettings, OpQueryEssStatus, Operation, PriorityLevel};
use crate::poller::{LinkPoller, PollerHandle, RetryPolicy};
use crate::simulator::{EssSimulator, SimProfile};

/// Sensor polling service
pub struct EssService {
    config: EssConfig,
    registry: Arc<SensorRegistry>,
    cancel: CancellationToken,
}

impl EssService {
    /// Validate the configuration and register every sensor
    pub fn new(config: EssConfig) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(SensorRegistry::new());
        for sensor in &config.sensors {
            let link = config
                .link(&sensor.link)
                .ok_or_else(|| EssrvError::not_found(format!("link '{}'", sensor.link)))?;
            let sys_descr = match (&sensor.sys_descr, &link.transport) {
                (Some(descr), _) => descr.clone(),
                (None, TransportConfig::Simulated { profile }) => {
                    profile.parse::<SimProfile>()?.sys_descr().to_string()
                },
            };
            let weather_sensor = WeatherSensor::new(
                sensor.name.clone(),
                Some(sys_descr),
                sensor.software_model.clone(),
            );
            let controller = Controller::new(
                sensor.name.clone(),
                sensor.link.clone(),
                config.service.fail_threshold,
            );
            registry.insert(weather_sensor.into_shared(), Arc::new(controller));
        }
        Ok(Self {
            config,
            registry,
            cancel: CancellationToken::new(),
        })
    }

    pub fn registry(&self) -> &Arc<SensorRegistry> {
        &self.registry
    }

    /// Token that stops every poller and scheduler when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn the pollers and schedulers
    pub fn start(&self) -> Result<Vec<JoinHandle<()>>> {
        let mut tasks = Vec::new();
        for link in &self.config.links {
            let comm_link = open_link(link)?;
            let (handle, poller) = LinkPoller::spawn(
                comm_link,
                RetryPolicy::from(&link.retry),
                self.cancel.child_token(),
            );
            tasks.push(poller);

            for sensor in self.config.sensors_on(&link.name) {
                let shared = self
                    .registry
                    .sensor(&sensor.name)
                    .ok_or_else(|| EssrvError::not_found(format!("sensor '{}'", sensor.name)))?;
                let controller = self.registry.controller(&sensor.name).ok_or_else(|| {
                    EssrvError::not_found(format!("controller '{}'", sensor.name))
                })?;
                let scheduler = SensorScheduler {
                    handle: handle.clone(),
                    sensor: shared,
                    controller,
                    config: sensor.clone(),
                    retry_threshold: link.retry_threshold,
                };
                tasks.push(tokio::spawn(scheduler.run(self.cancel.child_token())));
            }
        }
        info!(
            "{}: {} link(s), {} sensor(s)",
            self.config.service.name,
            self.config.links.len(),
            self.registry.len()
        );
        Ok(tasks)
    }

    /// Run until a shutdown signal arrives
    pub async fn run(self) -> Result<()> {
        let tasks = self.start()?;
        tokio::select! {
            signal = common::shutdown::wait_for_shutdown() => {
                info!("{} received, stopping pollers", signal);
            },
            () = self.cancel.cancelled() => {},
        }
        self.cancel.cancel();

        for result in join_all(tasks).await {
            if let Err(e) = result {
                error!("Task failed during shutdown: {}", e);
            }
        }
        info!("{} stopped", self.config.service.name);
        Ok(())
    }
}

/// Open the communication link described by `config`
pub fn open_link(config: &LinkConfig) -> Result<CommLink> {
    let transport = match &config.transport {
        TransportConfig::Simulated { profile } => {
            EssSimulator::with_profile(profile.parse::<SimProfile>()?)
        },
    };
    Ok(CommLink::new(
        config.name.clone(),
        Box::new(transport),
        config.timeout(),
    ))
}

/// Queues the periodic operations of one sensor
struct SensorScheduler {
    handle: PollerHandle,
    sensor: SharedSensor,
    controller: Arc<Controller>,
    config: SensorConfig,
    retry_threshold: u32,
}

impl SensorScheduler {
    fn retry_threshold(&self) -> u32 {
        if self.config.continuous {
            u32::MAX
        } else {
            self.retry_threshold
        }
    }

    fn status_op(&self) -> Box<dyn Operation> {
        Box::new(OpQueryEssStatus::new(
            Arc::clone(&self.sensor),
            Arc::clone(&self.controller),
            PriorityLevel::PollLow,
            self.retry_threshold(),
        ))
    }

    fn settings_op(&self) -> Box<dyn Operation> {
        Box::new(OpQueryEssSettings::new(
            Arc::clone(&self.sensor),
            Arc::clone(&self.controller),
            PriorityLevel::Settings,
            self.retry_threshold(),
        ))
    }

    async fn run(self, cancel: CancellationToken) {
        let mut status = interval(self.config.poll_period());
        status.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let settings_period = self.config.settings_period();
        let mut settings = interval_at(Instant::now() + settings_period, settings_period);
        settings.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if let Err(e) = self.handle.add_operation(self.settings_op()) {
            warn!("{}: {}", self.config.name, e);
            return;
        }
        loop {
            let op = tokio::select! {
                () = cancel.cancelled() => break,
                _ = status.tick() => self.status_op(),
                _ = settings.tick() => self.settings_op(),
            };
            if let Err(e) = self.handle.add_operation(op) {
                warn!("{}: {}", self.config.name, e);
                break;
            }
        }
    }
}
