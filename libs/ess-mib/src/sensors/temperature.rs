use serde_json::{Map, Value};

use crate::convert::{insert_json, EssDistance, EssNumber, EssTemperature};
use crate::table::{EssRow, EssTable};
use crate::{Mib1204, Result};

/// One air temperature sensor
#[derive(Debug, Clone)]
pub struct TemperatureSensor {
    number: u32,
    pub height: EssDistance,
    pub air_temp: EssTemperature,
}

impl TemperatureSensor {
    pub fn new(row: u32) -> Self {
        Self {
            number: row,
            height: EssDistance::new("height", Mib1204::EssTemperatureSensorHeight).for_row(row),
            air_temp: EssTemperature::new("air_temp", Mib1204::EssAirTemperature).for_row(row),
        }
    }
}

impl EssRow for TemperatureSensor {
    fn number(&self) -> u32 {
        self.number
    }

    fn to_json(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        insert_json(&mut map, &self.height)?;
        insert_json(&mut map, &self.air_temp)?;
        Ok(map)
    }
}

/// Air temperature table plus station-level temperatures
#[derive(Debug, Clone)]
pub struct TemperatureSensorsTable {
    pub table: EssTable<TemperatureSensor>,
    pub wet_bulb_temp: EssTemperature,
    pub dew_point_temp: EssTemperature,
    pub max_air_temp: EssTemperature,
    pub min_air_temp: EssTemperature,
}

impl TemperatureSensorsTable {
    pub fn new() -> Self {
        Self {
            table: EssTable::new(
                EssNumber::count("temperature_sensors", Mib1204::EssNumTemperatureSensors),
                TemperatureSensor::new,
            ),
            wet_bulb_temp: EssTemperature::new("wet_bulb_temp", Mib1204::EssWetbulbTemp),
            dew_point_temp: EssTemperature::new("dew_point_temp", Mib1204::EssDewpointTemp),
            max_air_temp: EssTemperature::new("max_air_temp", Mib1204::EssMaxTemp),
            min_air_temp: EssTemperature::new("min_air_temp", Mib1204::EssMinTemp),
        }
    }

    /// Air temperature of the first reporting sensor
    pub fn air_temp(&self) -> Option<&EssTemperature> {
        self.table
            .rows()
            .map(|r| &r.air_temp)
            .find(|t| t.get().is_some())
    }

    pub fn to_json(&self, map: &mut Map<String, Value>) -> Result<()> {
        if let Some(rows) = self.table.to_json()? {
            map.insert("temperature_sensor".to_string(), rows);
        }
        insert_json(map, &self.wet_bulb_temp)?;
        insert_json(map, &self.dew_point_temp)?;
        insert_json(map, &self.max_air_temp)?;
        insert_json(map, &self.min_air_temp)
    }
}

impl Default for TemperatureSensorsTable {
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
    fn test_air_temp_skips_silent_sensors() {
        let mut t = TemperatureSensorsTable::new();
        t.table
            .sensor_count_mut()
            .load(&WireValue::Integer(2))
            .unwrap();
        t.table.add_row();
        t.table
            .add_row()
            .unwrap()
            .air_temp
            .load(&WireValue::Integer(-35))
            .unwrap();
        assert_eq!(t.air_temp().and_then(|a| a.integer()), Some(-4));
    }

    #[test]
    fn test_json_layout() {
        let mut t = TemperatureSensorsTable::new();
        t.table
            .sensor_count_mut()
            .load(&WireValue::Integer(1))
            .unwrap();
        let row = t.table.add_row().unwrap();
        row.height.load(&WireValue::Integer(2)).unwrap();
        row.air_temp.load(&WireValue::Integer(111)).unwrap();
        t.dew_point_temp.load(&WireValue::Integer(-12)).unwrap();

        let mut map = Map::new();
        t.to_json(&mut map).unwrap();
        assert_eq!(
            Value::Object(map),
            serde_json::json!({
                "temperature_sensor": [{"height": 2, "air_temp": 11.1}],
                "dew_point_temp": -1.2,
            })
        );
    }
}
