use ess_units::DistanceUnits;
use serde_json::{Map, Value};

use crate::convert::{insert_json, EssDistance, EssEnum, EssPressure};
use crate::enums::VisibilitySituation;
use crate::{Mib1204, Result};

/// Elevation, pressure and visibility
#[derive(Debug, Clone)]
pub struct AtmosphericValues {
    /// Station elevation above sea level, meters
    pub reference_elevation: EssDistance,
    /// Pressure sensor height relative to the reference elevation
    pub pressure_sensor_height: EssDistance,
    pub atmospheric_pressure: EssPressure,
    pub visibility: EssDistance,
    pub visibility_situation: EssEnum<VisibilitySituation>,
}

impl AtmosphericValues {
    pub fn new() -> Self {
        Self {
            reference_elevation: EssDistance::new(
                "reference_elevation",
                Mib1204::EssReferenceHeight,
            )
            .with_range(-400, 8001),
            pressure_sensor_height: EssDistance::new(
                "pressure_sensor_height",
                Mib1204::EssPressureHeight,
            ),
            atmospheric_pressure: EssPressure::new(
                "atmospheric_pressure",
                Mib1204::EssAtmosphericPressure,
            ),
            visibility: EssDistance::new("visibility", Mib1204::EssVisibility)
                .with_units(1.0, DistanceUnits::Decimeters)
                .with_output(1.0, DistanceUnits::Meters, 0)
                .with_range(0, 1_000_001),
            visibility_situation: EssEnum::new(
                "visibility_situation",
                Mib1204::EssVisibilitySituation,
            ),
        }
    }

    pub fn to_json(&self, map: &mut Map<String, Value>) -> Result<()> {
        insert_json(map, &self.reference_elevation)?;
        insert_json(map, &self.pressure_sensor_height)?;
        insert_json(map, &self.atmospheric_pressure)?;
        insert_json(map, &self.visibility)?;
        insert_json(map, &self.visibility_situation)
    }
}

impl Default for AtmosphericValues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::EssConvertible;
    use ess_comlink::WireValue;

    #[test]
    fn test_visibility_decimeters_to_meters() {
        let mut a = AtmosphericValues::new();
        a.visibility.load(&WireValue::Integer(15_004)).unwrap();
        assert_eq!(a.visibility.integer(), Some(1500));
        assert_eq!(a.visibility.to_string(), "1500");
    }

    #[test]
    fn test_elevation_window() {
        let mut a = AtmosphericValues::new();
        a.reference_elevation.load(&WireValue::Integer(-400)).unwrap();
        assert_eq!(a.reference_elevation.integer(), Some(-400));
        a.reference_elevation.load(&WireValue::Integer(8001)).unwrap();
        assert_eq!(a.reference_elevation.integer(), None);
    }

    #[test]
    fn test_json_skips_nulls() {
        let mut a = AtmosphericValues::new();
        a.atmospheric_pressure.load(&WireValue::Integer(10_005)).unwrap();
        a.visibility_situation.load(&WireValue::Integer(3)).unwrap();
        let mut map = Map::new();
        a.to_json(&mut map).unwrap();
        assert_eq!(
            Value::Object(map),
            serde_json::json!({"atmospheric_pressure": 100050, "visibility_situation": "clear"})
        );
    }
}
