use std::cell::OnceCell;
use std::fmt;

use bytes::Bytes;
use ess_comlink::WireValue;
use serde_json::Value;

use super::EssConvertible;
use crate::{Mib1204, MibError, Result};

/// Fixed-length octet buffer read as printable text
#[derive(Debug, Clone)]
pub struct EssString {
    name: &'static str,
    object: Mib1204,
    row: Option<u32>,
    raw: Bytes,
    value: OnceCell<Option<String>>,
}

impl EssString {
    pub fn new(name: &'static str, object: Mib1204) -> Self {
        Self {
            name,
            object,
            row: None,
            raw: Bytes::new(),
            value: OnceCell::new(),
        }
    }

    pub fn for_row(mut self, row: u32) -> Self {
        self.row = Some(row);
        self
    }

    /// Text up to the first non-printable byte; blank text is `None`
    pub fn get(&self) -> Option<&str> {
        self.value
            .get_or_init(|| {
                let end = self
                    .raw
                    .iter()
                    .position(|b| !(b.is_ascii_graphic() || *b == b' '))
                    .unwrap_or(self.raw.len());
                let text = String::from_utf8_lossy(&self.raw[..end]);
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            })
            .as_deref()
    }
}

impl EssConvertible for EssString {
    fn name(&self) -> &'static str {
        self.name
    }

    fn object(&self) -> Mib1204 {
        self.object
    }

    fn row(&self) -> Option<u32> {
        self.row
    }

    fn load(&mut self, value: &WireValue) -> Result<()> {
        self.value = OnceCell::new();
        match value {
            WireValue::OctetString(bytes) => {
                self.raw = bytes.clone();
                Ok(())
            },
            WireValue::Integer(_) => {
                self.raw = Bytes::new();
                Err(MibError::TypeMismatch {
                    name: self.object.label(self.row),
                    expected: "octet string",
                    actual: value.to_string(),
                })
            },
        }
    }

    fn reset(&mut self) {
        self.raw = Bytes::new();
        self.value = OnceCell::new();
    }

    fn is_null(&self) -> bool {
        self.get().is_none()
    }

    fn to_double(&self) -> Result<Option<f64>> {
        Err(MibError::unsupported(self.name, "to_double"))
    }

    fn to_integer(&self) -> Result<Option<i32>> {
        Err(MibError::unsupported(self.name, "to_integer"))
    }

    fn to_json(&self) -> Result<Option<Value>> {
        Ok(self.get().map(Value::from))
    }
}

impl fmt::Display for EssString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get().unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn location(bytes: &'static [u8]) -> EssString {
        let mut s = EssString::new("location", Mib1204::EssPavementSensorLocation).for_row(1);
        s.load(&WireValue::OctetString(Bytes::from_static(bytes)))
            .unwrap();
        s
    }

    #[test]
    fn test_trims_at_nul() {
        let s = location(b"Bridge deck EB\0\0\0\0garbage");
        assert_eq!(s.get(), Some("Bridge deck EB"));
        assert_eq!(s.to_json().unwrap(), Some(Value::from("Bridge deck EB")));
    }

    #[test]
    fn test_trims_at_non_printable() {
        let s = location(b"Lane 2\x01\xff");
        assert_eq!(s.get(), Some("Lane 2"));
    }

    #[test]
    fn test_empty_is_null() {
        assert_eq!(location(b"\0\0\0\0").get(), None);
        assert_eq!(location(b"   ").get(), None);
        assert_eq!(location(b"").to_json().unwrap(), None);
    }

    #[test]
    fn test_numeric_operations_fail() {
        let s = location(b"12");
        assert!(matches!(
            s.to_double(),
            Err(MibError::Unsupported { operation: "to_double", .. })
        ));
        assert!(matches!(
            s.to_integer(),
            Err(MibError::Unsupported { operation: "to_integer", .. })
        ));
    }

    #[test]
    fn test_integer_wire_value_is_a_mismatch() {
        let mut s = EssString::new("description", Mib1204::EssNtcipSiteDescription);
        assert!(s.load(&WireValue::Integer(3)).is_err());
        assert!(s.is_null());
    }
}
