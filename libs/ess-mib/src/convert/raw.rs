use ess_comlink::WireValue;
use tracing::debug;

use crate::{Mib1204, MibError, Result};

/// Largest 16-bit value, the default exclusive maximum and missing sentinel
pub const MAX_WORD: i32 = 65535;

/// A raw wire integer with its valid window and missing sentinel
#[derive(Debug, Clone)]
pub struct RawInteger {
    name: &'static str,
    object: Mib1204,
    row: Option<u32>,
    raw: i32,
    min: i32,
    max: i32,
    missing: Option<i32>,
}

impl RawInteger {
    /// Default window `[0, 65535)` with 65535 as the missing sentinel
    pub fn new(name: &'static str, object: Mib1204) -> Self {
        Self {
            name,
            object,
            row: None,
            raw: MAX_WORD,
            min: 0,
            max: MAX_WORD,
            missing: Some(MAX_WORD),
        }
    }

    pub fn set_row(&mut self, row: u32) {
        self.row = Some(row);
    }

    /// Window `[min, max)`; `max` becomes the missing sentinel
    pub fn set_range(&mut self, min: i32, max: i32) {
        self.set_range_missing(min, max, Some(max));
    }

    /// Window `[min, max)` with an explicit sentinel (or none)
    pub fn set_range_missing(&mut self, min: i32, max: i32, missing: Option<i32>) {
        self.min = min;
        self.max = max;
        self.missing = missing;
        self.reset();
    }

    /// Replace only the sentinel
    pub fn set_missing(&mut self, missing: Option<i32>) {
        self.missing = missing;
        self.reset();
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn object(&self) -> Mib1204 {
        self.object
    }

    pub fn row(&self) -> Option<u32> {
        self.row
    }

    pub fn raw(&self) -> i32 {
        self.raw
    }

    pub fn set_raw(&mut self, raw: i32) {
        self.raw = raw;
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn missing(&self) -> Option<i32> {
        self.missing
    }

    /// Back to the sentinel, or `min` when there is none
    pub fn reset(&mut self) {
        self.raw = self.missing.unwrap_or(self.min);
    }

    /// Raw value if it is inside the window and not the sentinel
    pub fn ranged(&self) -> Option<i32> {
        if Some(self.raw) == self.missing {
            return None;
        }
        if self.raw < self.min || self.raw >= self.max {
            debug!(
                "{} out of range: {} not in [{}, {})",
                self.object.label(self.row),
                self.raw,
                self.min,
                self.max
            );
            return None;
        }
        Some(self.raw)
    }

    /// Take an integer wire value; values beyond `i32` saturate and fall out of range
    pub fn load(&mut self, value: &WireValue) -> Result<()> {
        match value {
            WireValue::Integer(v) => {
                self.raw = (*v).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
                Ok(())
            },
            WireValue::OctetString(_) => Err(MibError::TypeMismatch {
                name: self.object.label(self.row),
                expected: "integer",
                actual: value.to_string(),
            }),
        }
    }
}
