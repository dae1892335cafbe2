//! Per-sensor tables

pub mod pavement;
pub mod sub_surface;
pub mod temperature;
pub mod wind;

pub use pavement::{PavementSensor, PavementSensorsTable};
pub use sub_surface::{SubSurfaceSensor, SubSurfaceSensorsTable};
pub use temperature::{TemperatureSensor, TemperatureSensorsTable};
pub use wind::{WindSensor, WindSensorsTable};
