use serde_json::{Map, Value};

use crate::convert::{insert_json, EssBoolean, EssEnum, EssNumber, EssString};
use crate::enums::{EssEnumType, StationMobility, StationType};
use crate::{Mib1204, Result};

/// Station identity and housekeeping, read with the settings
#[derive(Debug, Clone)]
pub struct InstrumentValues {
    pub description: EssString,
    pub station_type: EssEnum<StationType>,
    pub mobility: EssEnum<StationMobility>,
    pub door_open: EssBoolean,
    /// Battery charge, percent
    pub battery: EssNumber,
    /// Line voltage, volts
    pub line_volts: EssNumber,
}

impl InstrumentValues {
    pub fn new() -> Self {
        Self {
            description: EssString::new("description", Mib1204::EssNtcipSiteDescription),
            station_type: EssEnum::new("station_type", Mib1204::EssTypeofStation)
                .with_missing(StationType::MissingValue.ordinal()),
            mobility: EssEnum::new("station_mobility", Mib1204::EssStationMobility),
            door_open: EssBoolean::new("door_open", Mib1204::EssDoorStatus),
            battery: EssNumber::percent("battery", Mib1204::EssBatteryStatus),
            line_volts: EssNumber::new("line_volts", Mib1204::EssLineVolts)
                .with_scale(2.0)
                .with_range(0, 255),
        }
    }

    pub fn to_json(&self, map: &mut Map<String, Value>) -> Result<()> {
        insert_json(map, &self.description)?;
        insert_json(map, &self.station_type)?;
        insert_json(map, &self.mobility)?;
        insert_json(map, &self.door_open)?;
        insert_json(map, &self.battery)?;
        insert_json(map, &self.line_volts)
    }
}

impl Default for InstrumentValues {
    fn default() -> Self {
        Self::new()
    }
}
