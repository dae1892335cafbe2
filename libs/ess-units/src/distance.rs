use serde::{Deserialize, Serialize};

const FEET_PER_MILE: f64 = 5280.0;
const METERS_PER_MILE: f64 = 1609.344;

/// Distance units, by their length in meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnits {
    Kilometers,
    Meters,
    Decimeters,
    Centimeters,
    Millimeters,
    TenthMillimeters,
    HundredthMillimeters,
    Micrometers,
    Miles,
    Yards,
    Feet,
    Inches,
}

impl DistanceUnits {
    /// Meters per unit
    pub fn factor(self) -> f64 {
        match self {
            DistanceUnits::Kilometers => 1000.0,
            DistanceUnits::Meters => 1.0,
            DistanceUnits::Decimeters => 0.1,
            DistanceUnits::Centimeters => 0.01,
            DistanceUnits::Millimeters => 0.001,
            DistanceUnits::TenthMillimeters => 0.0001,
            DistanceUnits::HundredthMillimeters => 0.00001,
            DistanceUnits::Micrometers => 0.000001,
            DistanceUnits::Miles => METERS_PER_MILE,
            DistanceUnits::Yards => METERS_PER_MILE / FEET_PER_MILE * 3.0,
            DistanceUnits::Feet => METERS_PER_MILE / FEET_PER_MILE,
            DistanceUnits::Inches => METERS_PER_MILE / FEET_PER_MILE / 12.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DistanceUnits::Kilometers => "km",
            DistanceUnits::Meters => "m",
            DistanceUnits::Decimeters => "dm",
            DistanceUnits::Centimeters => "cm",
            DistanceUnits::Millimeters => "mm",
            DistanceUnits::TenthMillimeters => "0.1mm",
            DistanceUnits::HundredthMillimeters => "0.01mm",
            DistanceUnits::Micrometers => "µm",
            DistanceUnits::Miles => "mi",
            DistanceUnits::Yards => "yd",
            DistanceUnits::Feet => "ft",
            DistanceUnits::Inches => "in",
        }
    }
}

linear_quantity!(
    /// Length, height or depth
    Distance,
    DistanceUnits
);
