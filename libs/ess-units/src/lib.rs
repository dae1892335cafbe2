//! Physical quantities reported by environmental sensor stations
//!
//! Every quantity is an immutable `(value, units)` pair. Conversions never mutate;
//! they produce the value expressed in another unit. Linear quantities convert
//! through a per-unit factor to a base unit, temperature is affine.

#[macro_use]
mod quantity;

pub mod angle;
pub mod distance;
pub mod interval;
pub mod pressure;
pub mod speed;
pub mod temperature;

pub use angle::{Angle, AngleUnits};
pub use distance::{Distance, DistanceUnits};
pub use interval::{Interval, IntervalUnits};
pub use pressure::{Pressure, PressureUnits};
pub use quantity::Quantity;
pub use speed::{Speed, SpeedUnits};
pub use temperature::{Temperature, TemperatureUnits};
