use std::cell::OnceCell;
use std::fmt;

use ess_comlink::WireValue;
use serde_json::Value;

use super::{json_number, round_digits, write_fixed, EssConvertible, RawInteger};
use crate::{Mib1204, Result};

/// Dimensionless number: `raw × scale`
#[derive(Debug, Clone)]
pub struct EssNumber {
    raw: RawInteger,
    scale: f64,
    digits: usize,
    value: OnceCell<Option<f64>>,
}

impl EssNumber {
    pub fn new(name: &'static str, object: Mib1204) -> Self {
        Self {
            raw: RawInteger::new(name, object),
            scale: 1.0,
            digits: 0,
            value: OnceCell::new(),
        }
    }

    /// Percentage in `[0, 101)`
    pub fn percent(name: &'static str, object: Mib1204) -> Self {
        Self::new(name, object).with_range(0, 101)
    }

    /// Sensor count in `[0, 255)`; a zero count reads as missing
    pub fn count(name: &'static str, object: Mib1204) -> Self {
        Self::new(name, object).with_range_missing(0, 255, Some(0))
    }

    /// Radiation in W/m² within `[-2048, 2049)`
    pub fn radiation(name: &'static str, object: Mib1204) -> Self {
        Self::new(name, object).with_range(-2048, 2049)
    }

    pub fn for_row(mut self, row: u32) -> Self {
        self.raw.set_row(row);
        self
    }

    pub fn with_range(mut self, min: i32, max: i32) -> Self {
        self.raw.set_range(min, max);
        self
    }

    pub fn with_range_missing(mut self, min: i32, max: i32, missing: Option<i32>) -> Self {
        self.raw.set_range_missing(min, max, missing);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    /// Memoized scaled value
    pub fn get(&self) -> Option<f64> {
        *self
            .value
            .get_or_init(|| self.raw.ranged().map(|r| f64::from(r) * self.scale))
    }

    /// Override the decoded value
    pub fn set_value(&mut self, value: Option<f64>) {
        self.value = OnceCell::from(value);
    }

    pub fn raw(&self) -> i32 {
        self.raw.raw()
    }

    pub fn set_raw(&mut self, raw: i32) {
        self.raw.set_raw(raw);
        self.value = OnceCell::new();
    }

    /// Value rounded to the configured digits
    pub fn rounded(&self) -> Option<f64> {
        self.get().map(|v| round_digits(v, self.digits))
    }

    pub fn integer(&self) -> Option<i32> {
        self.get().map(|v| v.round() as i32)
    }
}

impl EssConvertible for EssNumber {
    fn name(&self) -> &'static str {
        self.raw.name()
    }

    fn object(&self) -> Mib1204 {
        self.raw.object()
    }

    fn row(&self) -> Option<u32> {
        self.raw.row()
    }

    fn load(&mut self, value: &WireValue) -> Result<()> {
        self.value = OnceCell::new();
        self.raw.load(value)
    }

    fn reset(&mut self) {
        self.raw.reset();
        self.value = OnceCell::new();
    }

    fn is_null(&self) -> bool {
        self.get().is_none()
    }

    fn to_double(&self) -> Result<Option<f64>> {
        Ok(self.get())
    }

    fn to_json(&self) -> Result<Option<Value>> {
        self.get().map(|v| json_number(v, self.digits)).transpose()
    }
}

impl fmt::Display for EssNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.get(), self.digits)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_get_is_memoized() {
        let mut n = EssNumber::percent("relative_humidity", Mib1204::EssRelativeHumidity);
        n.load(&WireValue::Integer(87)).unwrap();
        assert_eq!(n.get(), Some(87.0));
        assert_eq!(n.get(), Some(87.0));
        assert_eq!(n.to_integer().unwrap(), Some(87));
    }

    #[test]
    fn test_load_clears_memo() {
        let mut n = EssNumber::percent("relative_humidity", Mib1204::EssRelativeHumidity);
        n.load(&WireValue::Integer(40)).unwrap();
        assert_eq!(n.get(), Some(40.0));
        n.load(&WireValue::Integer(101)).unwrap();
        assert_eq!(n.get(), None);
    }

    #[test]
    fn test_count_zero_is_missing() {
        let mut n = EssNumber::count("pavement_sensors", Mib1204::NumEssPavementSensors);
        assert!(n.is_null());
        n.load(&WireValue::Integer(0)).unwrap();
        assert_eq!(n.integer(), None);
        n.load(&WireValue::Integer(3)).unwrap();
        assert_eq!(n.integer(), Some(3));
    }

    #[test]
    fn test_scale_and_digits() {
        let mut n = EssNumber::new("line_volts", Mib1204::EssLineVolts)
            .with_scale(2.0)
            .with_range(0, 255);
        n.load(&WireValue::Integer(60)).unwrap();
        assert_eq!(n.get(), Some(120.0));
        assert_eq!(n.to_string(), "120");

        let mut salinity = EssNumber::new("salinity", Mib1204::EssSurfaceSalinity)
            .with_scale(0.1)
            .with_digits(1)
            .for_row(2);
        salinity.load(&WireValue::Integer(35)).unwrap();
        assert_eq!(salinity.to_string(), "3.5");
        assert_eq!(salinity.log_entry(), "essSurfaceSalinity.2=3.5");
    }

    #[test]
    fn test_set_value_overrides_memo() {
        let mut n = EssNumber::percent("friction", Mib1204::PavementSensorSurfaceFriction);
        n.set_value(Some(42.0));
        assert_eq!(n.integer(), Some(42));
        n.reset();
        assert_eq!(n.integer(), None);
    }

    #[test]
    fn test_json_omits_null() {
        let n = EssNumber::radiation("total_radiation", Mib1204::EssTotalRadiation);
        assert_eq!(n.to_json().unwrap(), None);
        assert_eq!(n.to_string(), "");
        assert_eq!(n.log_entry(), "essTotalRadiation=null");
    }
}
