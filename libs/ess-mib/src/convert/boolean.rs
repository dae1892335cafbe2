use std::cell::OnceCell;
use std::fmt;

use ess_comlink::WireValue;
use serde_json::Value;

use super::{EssConvertible, RawInteger};
use crate::{Mib1204, Result};

/// Two-state flag in the window `[0, 2)`; 2 is the missing sentinel
#[derive(Debug, Clone)]
pub struct EssBoolean {
    raw: RawInteger,
    value: OnceCell<Option<bool>>,
}

impl EssBoolean {
    pub fn new(name: &'static str, object: Mib1204) -> Self {
        let mut raw = RawInteger::new(name, object);
        raw.set_range(0, 2);
        Self {
            raw,
            value: OnceCell::new(),
        }
    }

    /// True iff the raw value is the top of the window
    pub fn get(&self) -> Option<bool> {
        *self
            .value
            .get_or_init(|| self.raw.ranged().map(|r| r == self.raw.max() - 1))
    }
}

impl EssConvertible for EssBoolean {
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
        Ok(self.get().map(|b| if b { 1.0 } else { 0.0 }))
    }

    fn to_json(&self) -> Result<Option<Value>> {
        Ok(self.get().map(Value::from))
    }
}

impl fmt::Display for EssBoolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(b) => write!(f, "{}", b),
            None => Ok(()),
        }
    }
}
