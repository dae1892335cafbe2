use serde::{Deserialize, Serialize};

const METERS_PER_MILE: f64 = 1609.344;
const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Speed units, by their value in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnits {
    /// Meters per second
    Mps,
    /// Kilometers per hour
    Kph,
    /// Miles per hour
    Mph,
    Knots,
    /// Millimeters per hour, used for precipitation rates
    Mmph,
}

impl SpeedUnits {
    /// Meters per second per unit
    pub fn factor(self) -> f64 {
        match self {
            SpeedUnits::Mps => 1.0,
            SpeedUnits::Kph => 1000.0 / SECONDS_PER_HOUR,
            SpeedUnits::Mph => METERS_PER_MILE / SECONDS_PER_HOUR,
            SpeedUnits::Knots => METERS_PER_NAUTICAL_MILE / SECONDS_PER_HOUR,
            SpeedUnits::Mmph => 0.001 / SECONDS_PER_HOUR,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            SpeedUnits::Mps => "m/s",
            SpeedUnits::Kph => "km/h",
            SpeedUnits::Mph => "mph",
            SpeedUnits::Knots => "kn",
            SpeedUnits::Mmph => "mm/h",
        }
    }
}

linear_quantity!(
    /// Wind speed or precipitation rate
    Speed,
    SpeedUnits
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quantity;

    #[test]
    fn test_mps_to_kph_and_mph() {
        let s = Speed::new(10.0, SpeedUnits::Mps);
        assert!((s.value_in(SpeedUnits::Kph) - 36.0).abs() < 1e-9);
        assert!((s.value_in(SpeedUnits::Mph) - 22.369_362_920_544).abs() < 1e-6);
    }

    #[test]
    fn test_precipitation_rate() {
        let s = Speed::new(10.0 * 0.36, SpeedUnits::Mmph);
        assert!((s.value_in(SpeedUnits::Mmph) - 3.6).abs() < 1e-9);
        assert!(s.value_in(SpeedUnits::Mps) < 1e-5);
    }
}
