//! Pavement sensors
//!
//! The base row objects date from the first NTCIP 1204 release. Conductivity
//! and ice-or-water depth arrived with V2, and friction and model
//! information with V4.

use ess_units::DistanceUnits;
use serde_json::{Map, Value};

use crate::convert::{
    insert_json, EssConvertible, EssDistance, EssEnum, EssNumber, EssString, EssTemperature,
};
use crate::enums::{
    PavementSensorError, PavementSensorType, PavementType, SurfaceBlackIceSignal, SurfaceStatus,
};
use crate::table::{EssRow, EssTable};
use crate::{Mib1204, Result};

/// One pavement (surface) sensor
#[derive(Debug, Clone)]
pub struct PavementSensor {
    number: u32,
    pub location: EssString,
    pub pavement_type: EssEnum<PavementType>,
    pub height: EssDistance,
    /// Percent of the sensor exposed to traffic
    pub exposure: EssNumber,
    pub sensor_type: EssEnum<PavementSensorType>,
    pub surface_status: EssEnum<SurfaceStatus>,
    pub surface_temp: EssTemperature,
    pub pavement_temp: EssTemperature,
    /// Meters, millimeters on the wire
    pub surface_water_depth: EssDistance,
    /// Parts per 100,000 by weight
    pub salinity: EssNumber,
    pub freeze_point: EssTemperature,
    pub black_ice_signal: EssEnum<SurfaceBlackIceSignal>,
    pub sensor_error: EssEnum<PavementSensorError>,
    /// Meters, tenths of a millimeter on the wire
    pub ice_or_water_depth: EssDistance,
    /// Millimhos per centimeter
    pub conductivity: EssNumber,
    pub model_info: EssNumber,
    /// Depth of the pavement temperature sensor, centimeters
    pub temp_depth: EssDistance,
    /// Coefficient of friction, percent
    pub friction: EssNumber,
}

impl PavementSensor {
    pub fn new(row: u32) -> Self {
        Self {
            number: row,
            location: EssString::new("location", Mib1204::EssPavementSensorLocation).for_row(row),
            pavement_type: EssEnum::new("pavement_type", Mib1204::EssPavementType).for_row(row),
            height: EssDistance::new("height", Mib1204::EssPavementElevation).for_row(row),
            exposure: EssNumber::percent("exposure", Mib1204::EssPavementExposure).for_row(row),
            sensor_type: EssEnum::new("sensor_type", Mib1204::EssPavementSensorType).for_row(row),
            surface_status: EssEnum::new("surface_status", Mib1204::EssSurfaceStatus)
                .for_row(row),
            surface_temp: EssTemperature::new("surface_temp", Mib1204::EssSurfaceTemperature)
                .for_row(row),
            pavement_temp: EssTemperature::new("pavement_temp", Mib1204::EssPavementTemperature)
                .for_row(row),
            surface_water_depth: EssDistance::new(
                "surface_water_depth",
                Mib1204::EssSurfaceWaterDepth,
            )
            .for_row(row)
            .with_units(1.0, DistanceUnits::Millimeters)
            .with_output(1.0, DistanceUnits::Meters, 3)
            .with_range(0, 255),
            salinity: EssNumber::new("salinity", Mib1204::EssSurfaceSalinity)
                .for_row(row)
                .with_scale(10.0),
            freeze_point: EssTemperature::new("freeze_point", Mib1204::EssSurfaceFreezePoint)
                .for_row(row),
            black_ice_signal: EssEnum::new("black_ice_signal", Mib1204::EssSurfaceBlackIceSignal)
                .for_row(row),
            sensor_error: EssEnum::new("sensor_error", Mib1204::EssPavementSensorError)
                .for_row(row),
            ice_or_water_depth: EssDistance::new(
                "ice_or_water_depth",
                Mib1204::EssSurfaceIceOrWaterDepth,
            )
            .for_row(row)
            .with_units(0.1, DistanceUnits::Millimeters)
            .with_output(1.0, DistanceUnits::Meters, 4)
            .with_range(0, 65535),
            conductivity: EssNumber::new("conductivity", Mib1204::EssSurfaceConductivityV2)
                .for_row(row),
            model_info: EssNumber::new("model_info", Mib1204::PavementSensorModelInformation)
                .for_row(row)
                .with_range_missing(1, 256, Some(0)),
            temp_depth: EssDistance::new("temp_depth", Mib1204::PavementSensorTemperatureDepth)
                .for_row(row)
                .with_units(1.0, DistanceUnits::Centimeters)
                .with_range(2, 11),
            friction: EssNumber::percent("friction", Mib1204::PavementSensorSurfaceFriction)
                .for_row(row),
        }
    }

    /// Status objects common to every firmware version
    pub fn status_objects(&mut self) -> Vec<&mut dyn EssConvertible> {
        vec![
            &mut self.surface_status as &mut dyn EssConvertible,
            &mut self.surface_temp,
            &mut self.pavement_temp,
            &mut self.freeze_point,
            &mut self.sensor_error,
            &mut self.salinity,
            &mut self.black_ice_signal,
        ]
    }

    /// Objects added in V2
    pub fn v2_objects(&mut self) -> Vec<&mut dyn EssConvertible> {
        vec![
            &mut self.ice_or_water_depth as &mut dyn EssConvertible,
            &mut self.conductivity,
            &mut self.model_info,
            &mut self.temp_depth,
        ]
    }

    /// V1 water depth, deprecated by V2
    pub fn v1_objects(&mut self) -> Vec<&mut dyn EssConvertible> {
        vec![&mut self.surface_water_depth as &mut dyn EssConvertible]
    }

    /// Configuration objects read with the settings
    pub fn settings_objects(&mut self) -> Vec<&mut dyn EssConvertible> {
        vec![
            &mut self.location as &mut dyn EssConvertible,
            &mut self.pavement_type,
            &mut self.height,
            &mut self.exposure,
            &mut self.sensor_type,
        ]
    }
}

impl EssRow for PavementSensor {
    fn number(&self) -> u32 {
        self.number
    }

    /// A sensor reporting an error does not represent the station
    fn is_active(&self) -> bool {
        self.sensor_error.valid().is_none()
    }

    fn to_json(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        insert_json(&mut map, &self.location)?;
        insert_json(&mut map, &self.pavement_type)?;
        insert_json(&mut map, &self.height)?;
        insert_json(&mut map, &self.exposure)?;
        insert_json(&mut map, &self.sensor_type)?;
        insert_json(&mut map, &self.surface_status)?;
        insert_json(&mut map, &self.surface_temp)?;
        insert_json(&mut map, &self.pavement_temp)?;
        insert_json(&mut map, &self.sensor_error)?;
        insert_json(&mut map, &self.surface_water_depth)?;
        insert_json(&mut map, &self.salinity)?;
        insert_json(&mut map, &self.freeze_point)?;
        insert_json(&mut map, &self.black_ice_signal)?;
        insert_json(&mut map, &self.ice_or_water_depth)?;
        insert_json(&mut map, &self.conductivity)?;
        insert_json(&mut map, &self.model_info)?;
        insert_json(&mut map, &self.temp_depth)?;
        insert_json(&mut map, &self.friction)?;
        Ok(map)
    }
}

/// Pavement table plus the mobile-platform friction object
#[derive(Debug, Clone)]
pub struct PavementSensorsTable {
    pub table: EssTable<PavementSensor>,
    pub mobile_friction: EssNumber,
}

impl PavementSensorsTable {
    pub fn new() -> Self {
        Self {
            table: EssTable::new(
                EssNumber::count("pavement_sensors", Mib1204::NumEssPavementSensors),
                PavementSensor::new,
            ),
            mobile_friction: EssNumber::percent("mobile_friction", Mib1204::EssMobileFriction),
        }
    }

    /// First row without a reported error
    pub fn first_active(&self) -> Option<&PavementSensor> {
        self.table.first_active()
    }

    /// First active row among the given row numbers
    pub fn first_active_of(&self, rows: &[u32]) -> Option<&PavementSensor> {
        rows.iter()
            .filter_map(|n| self.table.row(*n))
            .find(|r| r.is_active())
    }

    pub fn to_json(&self, map: &mut Map<String, Value>) -> Result<()> {
        if let Some(rows) = self.table.to_json()? {
            map.insert("pavement_sensor".to_string(), rows);
        }
        Ok(())
    }
}

impl Default for PavementSensorsTable {
    fn default() -> Self {
        Self::new()
    }
}
