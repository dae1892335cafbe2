//! Raw value conversion
//!
//! Every convertible owns one raw wire value with a valid window `[min, max)`
//! and an optional "missing" sentinel. The domain value is computed lazily, at
//! most once, and is `None` whenever the raw value is out of range or equals
//! the sentinel. Those cases are observations, never errors.

mod boolean;
mod enumerated;
mod measure;
mod number;
mod raw;
mod string;

use std::fmt;

use ess_comlink::{ObjectId, WireValue};
use serde_json::{Map, Value};

use crate::{Mib1204, MibError, Result};

pub use boolean::EssBoolean;
pub use enumerated::EssEnum;
pub use measure::{
    EssAngle, EssDistance, EssInterval, EssMeasure, EssPressure, EssSpeed, EssTemperature,
    MeasureDefaults, UnitSpec,
};
pub use number::EssNumber;
pub use raw::{RawInteger, MAX_WORD};
pub use string::EssString;

/// One queryable object and its decoded value
pub trait EssConvertible: fmt::Display + Send {
    /// JSON key of the value
    fn name(&self) -> &'static str;

    fn object(&self) -> Mib1204;

    /// 1-based row for table columns
    fn row(&self) -> Option<u32>;

    fn oid(&self) -> ObjectId {
        self.object().oid(self.row())
    }

    /// Replace the raw value with one received from the device
    fn load(&mut self, value: &WireValue) -> Result<()>;

    /// Return to the missing state
    fn reset(&mut self);

    fn is_null(&self) -> bool;

    fn to_double(&self) -> Result<Option<f64>>;

    fn to_integer(&self) -> Result<Option<i32>> {
        Ok(self.to_double()?.map(|v| v.round() as i32))
    }

    fn to_json(&self) -> Result<Option<Value>>;

    /// `object.row=value` for poll logs
    fn log_entry(&self) -> String {
        let label = self.object().label(self.row());
        if self.is_null() {
            format!("{}=null", label)
        } else {
            format!("{}={}", label, self)
        }
    }
}

/// Insert the convertible under its name, skipping null values
pub fn insert_json(map: &mut Map<String, Value>, value: &dyn EssConvertible) -> Result<()> {
    if let Some(json) = value.to_json()? {
        map.insert(value.name().to_string(), json);
    }
    Ok(())
}

/// Numeric JSON value rounded to `digits`; whole numbers when `digits` is 0
pub(crate) fn json_number(value: f64, digits: usize) -> Result<Value> {
    if !value.is_finite() {
        return Err(MibError::json(format!("non-finite value {}", value)));
    }
    if digits == 0 {
        return Ok(Value::from(value.round() as i64));
    }
    let factor = 10f64.powi(digits as i32);
    serde_json::Number::from_f64((value * factor).round() / factor)
        .map(Value::Number)
        .ok_or_else(|| MibError::json(format!("unrepresentable value {}", value)))
}

/// Value rounded to `digits` fractional digits
pub(crate) fn round_digits(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

pub(crate) fn write_fixed(f: &mut fmt::Formatter<'_>, value: Option<f64>, digits: usize) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{:.*}", digits, v),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_json_number_digits() {
        assert_eq!(json_number(20.5, 0).unwrap(), Value::from(21));
        assert_eq!(json_number(20.456, 2).unwrap(), serde_json::json!(20.46));
        assert_eq!(json_number(-3.0, 1).unwrap(), serde_json::json!(-3.0));
    }

    #[test]
    fn test_json_number_rejects_non_finite() {
        assert!(matches!(json_number(f64::NAN, 2), Err(MibError::Json(_))));
        assert!(matches!(json_number(f64::INFINITY, 0), Err(MibError::Json(_))));
    }

    #[test]
    fn test_round_digits() {
        assert_eq!(round_digits(2.345_6, 3), 2.346);
        assert_eq!(round_digits(7.5, 0), 8.0);
    }
}
