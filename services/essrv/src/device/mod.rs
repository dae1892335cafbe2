//! Device models: weather sensors, their controllers and the registry

pub mod controller;
pub mod registry;
pub mod weather_sensor;

pub use controller::{CommEvent, Controller, ControllerHealth, DEFAULT_FAIL_THRESHOLD};
pub use registry::SensorRegistry;
pub use weather_sensor::{AttributeChange, SharedSensor, WeatherReadings, WeatherSensor};
