use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Quantity;

const KELVIN_OFFSET: f64 = 273.15;

/// Temperature scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnits {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnits {
    fn to_kelvin(self, value: f64) -> f64 {
        match self {
            TemperatureUnits::Celsius => value + KELVIN_OFFSET,
            TemperatureUnits::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
            TemperatureUnits::Kelvin => value,
        }
    }

    fn from_kelvin(self, kelvin: f64) -> f64 {
        match self {
            TemperatureUnits::Celsius => kelvin - KELVIN_OFFSET,
            TemperatureUnits::Fahrenheit => (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0,
            TemperatureUnits::Kelvin => kelvin,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnits::Celsius => "°C",
            TemperatureUnits::Fahrenheit => "°F",
            TemperatureUnits::Kelvin => "K",
        }
    }
}

/// Air, surface or sub-surface temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    value: f64,
    units: TemperatureUnits,
}

impl Temperature {
    pub const fn new(value: f64, units: TemperatureUnits) -> Self {
        Self { value, units }
    }
}

impl Quantity for Temperature {
    type Units = TemperatureUnits;

    fn new(value: f64, units: TemperatureUnits) -> Self {
        Self { value, units }
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn units(&self) -> TemperatureUnits {
        self.units
    }

    fn value_in(&self, units: TemperatureUnits) -> f64 {
        if units == self.units {
            self.value
        } else {
            units.from_kelvin(self.units.to_kelvin(self.value))
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.units.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_fahrenheit() {
        let t = Temperature::new(20.5, TemperatureUnits::Celsius);
        assert!((t.value_in(TemperatureUnits::Fahrenheit) - 68.9).abs() < 1e-9);
        let back = Temperature::new(68.9, TemperatureUnits::Fahrenheit);
        assert!((back.value_in(TemperatureUnits::Celsius) - 20.5).abs() < 1e-9);
    }

    #[test]
    fn test_kelvin() {
        let t = Temperature::new(-40.0, TemperatureUnits::Celsius);
        assert!((t.value_in(TemperatureUnits::Kelvin) - 233.15).abs() < 1e-9);
        assert!((t.value_in(TemperatureUnits::Fahrenheit) + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_units_is_exact() {
        let t = Temperature::new(-0.1, TemperatureUnits::Celsius);
        assert_eq!(t.value_in(TemperatureUnits::Celsius), -0.1);
    }
}
