use ess_units::DistanceUnits;
use serde_json::{Map, Value};

use crate::convert::{
    insert_json, EssConvertible, EssDistance, EssEnum, EssNumber, EssString, EssTemperature,
};
use crate::enums::{SubSurfaceSensorError, SubSurfaceType};
use crate::table::{EssRow, EssTable};
use crate::{Mib1204, Result};

/// One sub-surface sensor
#[derive(Debug, Clone)]
pub struct SubSurfaceSensor {
    number: u32,
    pub location: EssString,
    pub sub_surface_type: EssEnum<SubSurfaceType>,
    /// Meters below the surface, centimeters on the wire
    pub depth: EssDistance,
    pub temp: EssTemperature,
    pub moisture: EssNumber,
    pub sensor_error: EssEnum<SubSurfaceSensorError>,
}

impl SubSurfaceSensor {
    pub fn new(row: u32) -> Self {
        Self {
            number: row,
            location: EssString::new("location", Mib1204::EssSubSurfaceSensorLocation)
                .for_row(row),
            sub_surface_type: EssEnum::new("sub_surface_type", Mib1204::EssSubSurfaceType)
                .for_row(row),
            depth: EssDistance::new("depth", Mib1204::EssSubSurfaceSensorDepth)
                .for_row(row)
                .with_units(1.0, DistanceUnits::Centimeters)
                .with_output(1.0, DistanceUnits::Meters, 2),
            temp: EssTemperature::new("temp", Mib1204::EssSubSurfaceTemperature).for_row(row),
            moisture: EssNumber::percent("moisture", Mib1204::EssSubSurfaceMoisture).for_row(row),
            sensor_error: EssEnum::new("sensor_error", Mib1204::EssSubSurfaceSensorError)
                .for_row(row),
        }
    }

    pub fn status_objects(&mut self) -> Vec<&mut dyn EssConvertible> {
        vec![
            &mut self.location as &mut dyn EssConvertible,
            &mut self.sub_surface_type,
            &mut self.depth,
            &mut self.temp,
            &mut self.sensor_error,
        ]
    }

    pub fn settings_objects(&mut self) -> Vec<&mut dyn EssConvertible> {
        vec![
            &mut self.location as &mut dyn EssConvertible,
            &mut self.sub_surface_type,
            &mut self.depth,
        ]
    }

    /// Defaults for a sensor whose row objects the device refused
    pub fn mark_unresponsive(&mut self) {
        self.location.reset();
        self.sub_surface_type.set_value(Some(SubSurfaceType::Unknown));
        self.depth.reset();
        self.temp.reset();
        self.sensor_error
            .set_value(Some(SubSurfaceSensorError::NoResponse));
    }
}

impl EssRow for SubSurfaceSensor {
    fn number(&self) -> u32 {
        self.number
    }

    /// Devices without the error object count as reporting no error
    fn is_active(&self) -> bool {
        match self.sensor_error.get() {
            None => true,
            Some(e) => matches!(
                e,
                SubSurfaceSensorError::NoError
                    | SubSurfaceSensorError::NoResponse
                    | SubSurfaceSensorError::Other
            ),
        }
    }

    fn to_json(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        insert_json(&mut map, &self.location)?;
        insert_json(&mut map, &self.sub_surface_type)?;
        insert_json(&mut map, &self.depth)?;
        insert_json(&mut map, &self.temp)?;
        insert_json(&mut map, &self.moisture)?;
        insert_json(&mut map, &self.sensor_error)?;
        map.insert("active".to_string(), Value::Bool(self.is_active()));
        Ok(map)
    }
}

#[derive(Debug, Clone)]
pub struct SubSurfaceSensorsTable {
    pub table: EssTable<SubSurfaceSensor>,
}

impl SubSurfaceSensorsTable {
    pub fn new() -> Self {
        Self {
            table: EssTable::new(
                EssNumber::count("sub_surface_sensors", Mib1204::NumEssSubSurfaceSensors),
                SubSurfaceSensor::new,
            ),
        }
    }

    /// Temperature of the first active sensor that reports one
    pub fn first_valid_temp(&self) -> Option<&EssTemperature> {
        self.table
            .rows()
            .filter(|r| r.is_active())
            .map(|r| &r.temp)
            .find(|t| !t.is_null())
    }

    pub fn to_json(&self, map: &mut Map<String, Value>) -> Result<()> {
        if let Some(rows) = self.table.to_json()? {
            map.insert("sub_surface_sensor".to_string(), rows);
        }
        Ok(())
    }
}

impl Default for SubSurfaceSensorsTable {
    fn default() -> Self {
        Self::new()
    }
}
