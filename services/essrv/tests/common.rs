//! Shared test harness: a simulated station on its own link

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use ess_comlink::CommLink;
use essrv::device::{Controller, SharedSensor, WeatherSensor};
use essrv::operation::{OpQueryEssSettings, OpQueryEssStatus, Operation, PriorityLevel};
use essrv::poller::{LinkPoller, RetryPolicy};
use essrv::simulator::{EssSimulator, SimProfile};
use tokio_util::sync::CancellationToken;

pub struct Station {
    pub sim: EssSimulator,
    pub sensor: SharedSensor,
    pub controller: Arc<Controller>,
}

impl Station {
    pub fn new(profile: SimProfile) -> Self {
        Self::with(EssSimulator::with_profile(profile), Some(profile.sys_descr()), None)
    }

    pub fn with(sim: EssSimulator, sys_descr: Option<&str>, software_model: Option<&str>) -> Self {
        let sensor = WeatherSensor::new(
            "ess_test",
            sys_descr.map(str::to_string),
            software_model.map(str::to_string),
        )
        .into_shared();
        Self {
            sim,
            sensor,
            controller: Arc::new(Controller::new("ess_test", "sim", 3)),
        }
    }

    pub fn link(&self) -> CommLink {
        CommLink::new("sim", Box::new(self.sim.clone()), Duration::from_millis(200))
    }

    pub fn status_op(&self, retry_threshold: u32) -> Box<dyn Operation> {
        Box::new(OpQueryEssStatus::new(
            Arc::clone(&self.sensor),
            Arc::clone(&self.controller),
            PriorityLevel::PollLow,
            retry_threshold,
        ))
    }

    pub fn settings_op(&self, retry_threshold: u32) -> Box<dyn Operation> {
        Box::new(OpQueryEssSettings::new(
            Arc::clone(&self.sensor),
            Arc::clone(&self.controller),
            PriorityLevel::Settings,
            retry_threshold,
        ))
    }

    /// Run operations on a fresh poller until its queue is empty
    pub async fn run(&self, ops: Vec<Box<dyn Operation>>) {
        let (poller, handle) =
            LinkPoller::new(self.link(), RetryPolicy::immediate(), CancellationToken::new());
        for op in ops {
            handle.add_operation(op).unwrap();
        }
        drop(handle);
        poller.run().await;
    }

    pub fn sample(&self) -> serde_json::Value {
        let sensor = self.sensor.read();
        serde_json::from_str(sensor.sample().unwrap()).unwrap()
    }

    pub fn settings(&self) -> serde_json::Value {
        let sensor = self.sensor.read();
        serde_json::from_str(sensor.settings().unwrap()).unwrap()
    }
}
