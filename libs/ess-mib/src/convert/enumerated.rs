use std::cell::OnceCell;
use std::fmt;

use ess_comlink::WireValue;
use serde_json::Value;

use super::{EssConvertible, RawInteger};
use crate::{EssEnumType, Mib1204, Result};

/// Raw integer mapped to an enum ordinal
#[derive(Debug, Clone)]
pub struct EssEnum<E: EssEnumType> {
    raw: RawInteger,
    value: OnceCell<Option<E>>,
}

impl<E: EssEnumType> EssEnum<E> {
    pub fn new(name: &'static str, object: Mib1204) -> Self {
        Self {
            raw: RawInteger::new(name, object),
            value: OnceCell::new(),
        }
    }

    pub fn for_row(mut self, row: u32) -> Self {
        self.raw.set_row(row);
        self
    }

    /// Treat `ordinal` as the missing sentinel
    pub fn with_missing(mut self, ordinal: i32) -> Self {
        self.raw.set_missing(Some(ordinal));
        self
    }

    /// Memoized decoded value, including placeholder values
    pub fn get(&self) -> Option<E> {
        *self
            .value
            .get_or_init(|| self.raw.ranged().and_then(E::from_ordinal))
    }

    /// Decoded value only if it carries real information
    pub fn valid(&self) -> Option<E> {
        self.get().filter(|e| e.is_valid())
    }

    /// Ordinal of the valid value
    pub fn valid_ordinal(&self) -> Option<i32> {
        self.valid().map(EssEnumType::ordinal)
    }

    pub fn set_value(&mut self, value: Option<E>) {
        self.value = OnceCell::from(value);
    }

    pub fn raw(&self) -> i32 {
        self.raw.raw()
    }
}

impl<E: EssEnumType> EssConvertible for EssEnum<E> {
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
        Ok(self.get().map(|e| f64::from(e.ordinal())))
    }

    fn to_json(&self) -> Result<Option<Value>> {
        Ok(self.valid().map(|e| Value::from(e.label())))
    }
}

impl<E: EssEnumType> fmt::Display for EssEnum<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(e) => f.write_str(e.label()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::enums::{CloudSituation, StationType, SurfaceStatus};

    #[test]
    fn test_ordinal_lookup() {
        let mut s = EssEnum::<SurfaceStatus>::new("surface_status", Mib1204::EssSurfaceStatus)
            .for_row(1);
        s.load(&WireValue::Integer(3)).unwrap();
        assert_eq!(s.get(), Some(SurfaceStatus::Dry));
        assert_eq!(s.to_string(), "dry");
        assert_eq!(s.to_integer().unwrap(), Some(3));
        assert_eq!(s.to_json().unwrap(), Some(Value::from("dry")));
    }

    #[test]
    fn test_unknown_ordinal_is_null() {
        let mut s = EssEnum::<CloudSituation>::new("cloud_situation", Mib1204::EssCloudSituation);
        s.load(&WireValue::Integer(42)).unwrap();
        assert_eq!(s.get(), None);
        assert_eq!(s.to_json().unwrap(), None);
    }

    #[test]
    fn test_placeholder_is_omitted_from_json() {
        let mut s = EssEnum::<CloudSituation>::new("cloud_situation", Mib1204::EssCloudSituation);
        s.load(&WireValue::Integer(0)).unwrap();
        assert_eq!(s.get(), Some(CloudSituation::Undefined));
        assert_eq!(s.valid(), None);
        assert_eq!(s.to_json().unwrap(), None);
    }

    #[test]
    fn test_missing_sentinel() {
        let mut t = EssEnum::<StationType>::new("station_type", Mib1204::EssTypeofStation)
            .with_missing(StationType::MissingValue.ordinal());
        assert!(t.is_null());
        t.load(&WireValue::Integer(0)).unwrap();
        assert_eq!(t.valid(), Some(StationType::Automatic));
        t.load(&WireValue::Integer(3)).unwrap();
        assert_eq!(t.get(), None);
    }

    #[test]
    fn test_set_value() {
        let mut s = EssEnum::<CloudSituation>::new("cloud_situation", Mib1204::EssCloudSituation);
        s.set_value(Some(CloudSituation::Clear));
        assert_eq!(s.valid_ordinal(), Some(5));
    }
}
