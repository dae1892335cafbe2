//! Wind sensors
//!
//! Early firmware exposes a single set of scalar wind objects. Later firmware
//! adds a table with one row per anemometer. Accessors prefer row 1 and fall
//! back to the scalars.

use serde_json::{Map, Value};

use crate::convert::{insert_json, EssAngle, EssDistance, EssEnum, EssNumber, EssSpeed};
use crate::enums::WindSituation;
use crate::table::{EssRow, EssTable};
use crate::{Mib1204, Result};

/// One anemometer
#[derive(Debug, Clone)]
pub struct WindSensor {
    number: u32,
    pub height: EssDistance,
    pub avg_speed: EssSpeed,
    pub avg_direction: EssAngle,
    pub spot_speed: EssSpeed,
    pub spot_direction: EssAngle,
    pub gust_speed: EssSpeed,
    pub gust_direction: EssAngle,
    pub situation: EssEnum<WindSituation>,
}

impl WindSensor {
    pub fn new(row: u32) -> Self {
        Self {
            number: row,
            height: EssDistance::new("height", Mib1204::WindSensorHeight).for_row(row),
            avg_speed: EssSpeed::new("avg_speed", Mib1204::WindSensorAvgSpeed).for_row(row),
            avg_direction: EssAngle::new("avg_direction", Mib1204::WindSensorAvgDirection)
                .for_row(row),
            spot_speed: EssSpeed::new("spot_speed", Mib1204::WindSensorSpotSpeed).for_row(row),
            spot_direction: EssAngle::new("spot_direction", Mib1204::WindSensorSpotDirection)
                .for_row(row),
            gust_speed: EssSpeed::new("gust_speed", Mib1204::WindSensorGustSpeed).for_row(row),
            gust_direction: EssAngle::new("gust_direction", Mib1204::WindSensorGustDirection)
                .for_row(row),
            situation: EssEnum::new("situation", Mib1204::WindSensorSituation).for_row(row),
        }
    }
}

impl EssRow for WindSensor {
    fn number(&self) -> u32 {
        self.number
    }

    fn to_json(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        insert_json(&mut map, &self.height)?;
        insert_json(&mut map, &self.avg_speed)?;
        insert_json(&mut map, &self.avg_direction)?;
        insert_json(&mut map, &self.spot_speed)?;
        insert_json(&mut map, &self.spot_direction)?;
        insert_json(&mut map, &self.gust_speed)?;
        insert_json(&mut map, &self.gust_direction)?;
        insert_json(&mut map, &self.situation)?;
        Ok(map)
    }
}

/// Wind table plus the legacy scalar objects
#[derive(Debug, Clone)]
pub struct WindSensorsTable {
    pub table: EssTable<WindSensor>,
    pub height: EssDistance,
    pub avg_speed: EssSpeed,
    pub avg_direction: EssAngle,
    pub spot_speed: EssSpeed,
    pub spot_direction: EssAngle,
    pub gust_speed: EssSpeed,
    pub gust_direction: EssAngle,
    pub situation: EssEnum<WindSituation>,
}

impl WindSensorsTable {
    pub fn new() -> Self {
        Self {
            table: EssTable::new(
                EssNumber::count("wind_sensors", Mib1204::WindSensorTableNumSensors),
                WindSensor::new,
            ),
            height: EssDistance::new("height", Mib1204::EssWindSensorHeight),
            avg_speed: EssSpeed::new("avg_speed", Mib1204::EssAvgWindSpeed),
            avg_direction: EssAngle::new("avg_direction", Mib1204::EssAvgWindDirection),
            spot_speed: EssSpeed::new("spot_speed", Mib1204::EssSpotWindSpeed),
            spot_direction: EssAngle::new("spot_direction", Mib1204::EssSpotWindDirection),
            gust_speed: EssSpeed::new("gust_speed", Mib1204::EssMaxWindGustSpeed),
            gust_direction: EssAngle::new("gust_direction", Mib1204::EssMaxWindGustDir),
            situation: EssEnum::new("situation", Mib1204::EssWindSituation),
        }
    }

    pub fn avg_speed(&self) -> &EssSpeed {
        self.table.fallback(|r| &r.avg_speed, &self.avg_speed)
    }

    pub fn avg_direction(&self) -> &EssAngle {
        self.table.fallback(|r| &r.avg_direction, &self.avg_direction)
    }

    pub fn spot_speed(&self) -> &EssSpeed {
        self.table.fallback(|r| &r.spot_speed, &self.spot_speed)
    }

    pub fn spot_direction(&self) -> &EssAngle {
        self.table.fallback(|r| &r.spot_direction, &self.spot_direction)
    }

    pub fn gust_speed(&self) -> &EssSpeed {
        self.table.fallback(|r| &r.gust_speed, &self.gust_speed)
    }

    pub fn gust_direction(&self) -> &EssAngle {
        self.table.fallback(|r| &r.gust_direction, &self.gust_direction)
    }

    pub fn situation(&self) -> &EssEnum<WindSituation> {
        self.table.fallback(|r| &r.situation, &self.situation)
    }

    /// The legacy scalars, shaped like a table row
    fn scalar_json(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        insert_json(&mut map, &self.height)?;
        insert_json(&mut map, &self.avg_speed)?;
        insert_json(&mut map, &self.avg_direction)?;
        insert_json(&mut map, &self.spot_speed)?;
        insert_json(&mut map, &self.spot_direction)?;
        insert_json(&mut map, &self.gust_speed)?;
        insert_json(&mut map, &self.gust_direction)?;
        insert_json(&mut map, &self.situation)?;
        Ok(map)
    }

    /// `"wind_sensor"` list; without table rows, one entry from the scalars
    pub fn to_json(&self, map: &mut Map<String, Value>) -> Result<()> {
        if let Some(rows) = self.table.to_json()? {
            map.insert("wind_sensor".to_string(), rows);
        } else {
            let scalars = self.scalar_json()?;
            if !scalars.is_empty() {
                map.insert(
                    "wind_sensor".to_string(),
                    Value::Array(vec![Value::Object(scalars)]),
                );
            }
        }
        Ok(())
    }
}

impl Default for WindSensorsTable {
    fn default() -> Self {
        Self::new()
    }
}
