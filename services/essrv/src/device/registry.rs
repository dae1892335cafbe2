//! Name-indexed sensors and controllers

use std::sync::Arc;

use dashmap::DashMap;

use super::controller::Controller;
use super::weather_sensor::SharedSensor;

/// Sensors and their controllers, shared between pollers and schedulers
#[derive(Debug, Default)]
pub struct SensorRegistry {
    sensors: DashMap<String, SharedSensor>,
    controllers: DashMap<String, Arc<Controller>>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sensor with the controller it is polled through
    pub fn insert(&self, sensor: SharedSensor, controller: Arc<Controller>) {
        let name = sensor.read().name().to_string();
        self.controllers.insert(name.clone(), controller);
        self.sensors.insert(name, sensor);
    }

    pub fn sensor(&self, name: &str) -> Option<SharedSensor> {
        self.sensors.get(name).map(|s| Arc::clone(s.value()))
    }

    pub fn controller(&self, name: &str) -> Option<Arc<Controller>> {
        self.controllers.get(name).map(|c| Arc::clone(c.value()))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sensors.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::device::WeatherSensor;

    #[test]
    fn test_insert_and_lookup() {
        let registry = SensorRegistry::new();
        registry.insert(
            WeatherSensor::new("ess_b", None, None).into_shared(),
            Arc::new(Controller::new("ess_b", "rwis", 3)),
        );
        registry.insert(
            WeatherSensor::new("ess_a", None, None).into_shared(),
            Arc::new(Controller::new("ess_a", "rwis", 3)),
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["ess_a", "ess_b"]);
        assert_eq!(registry.sensor("ess_a").unwrap().read().name(), "ess_a");
        assert_eq!(registry.controller("ess_b").unwrap().link(), "rwis");
        assert!(registry.sensor("ess_c").is_none());
    }
}
