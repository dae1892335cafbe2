use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Angle units, by their size in radians
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnits {
    Radians,
    Degrees,
    Revolutions,
}

impl AngleUnits {
    /// Radians per unit
    pub fn factor(self) -> f64 {
        match self {
            AngleUnits::Radians => 1.0,
            AngleUnits::Degrees => PI / 180.0,
            AngleUnits::Revolutions => 2.0 * PI,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AngleUnits::Radians => "rad",
            AngleUnits::Degrees => "°",
            AngleUnits::Revolutions => "rev",
        }
    }
}

linear_quantity!(
    /// Direction, such as a wind bearing
    Angle,
    AngleUnits
);
