use ess_units::{DistanceUnits, SpeedUnits};
use serde_json::{Map, Value};

use crate::convert::{insert_json, EssDistance, EssEnum, EssNumber, EssSpeed, MAX_WORD};
use crate::enums::PrecipSituation;
use crate::{Mib1204, Result};

/// Accumulated precipitation over a fixed window, tenths of a millimeter on the wire
fn precip_total(name: &'static str, object: Mib1204) -> EssDistance {
    EssDistance::new(name, object)
        .with_units(0.1, DistanceUnits::Millimeters)
        .with_output(1.0, DistanceUnits::Millimeters, 1)
        .with_range(0, MAX_WORD)
}

/// Humidity, precipitation and snow
#[derive(Debug, Clone)]
pub struct PrecipitationValues {
    pub relative_humidity: EssNumber,
    pub precip_rate: EssSpeed,
    pub precip_situation: EssEnum<PrecipSituation>,
    /// Standing water depth, centimeters
    pub water_depth: EssDistance,
    /// Snow depth next to the station, centimeters
    pub snow_depth: EssDistance,
    pub precip_1_hour: EssDistance,
    pub precip_3_hours: EssDistance,
    pub precip_6_hours: EssDistance,
    pub precip_12_hours: EssDistance,
    pub precip_24_hours: EssDistance,
}

impl PrecipitationValues {
    pub fn new() -> Self {
        Self {
            relative_humidity: EssNumber::percent(
                "relative_humidity",
                Mib1204::EssRelativeHumidity,
            ),
            precip_rate: EssSpeed::new("precip_rate", Mib1204::EssPrecipRate)
                .with_units(0.36, SpeedUnits::Mmph)
                .with_output(1.0, SpeedUnits::Mmph, 1),
            precip_situation: EssEnum::new("precip_situation", Mib1204::EssPrecipSituation),
            water_depth: EssDistance::new("water_depth", Mib1204::EssWaterDepth)
                .with_units(1.0, DistanceUnits::Centimeters),
            snow_depth: EssDistance::new("snow_depth", Mib1204::EssAdjacentSnowDepth)
                .with_units(1.0, DistanceUnits::Centimeters),
            precip_1_hour: precip_total("precip_1_hour", Mib1204::EssPrecipitationOneHour),
            precip_3_hours: precip_total("precip_3_hours", Mib1204::EssPrecipitationThreeHours),
            precip_6_hours: precip_total("precip_6_hours", Mib1204::EssPrecipitationSixHours),
            precip_12_hours: precip_total(
                "precip_12_hours",
                Mib1204::EssPrecipitationTwelveHours,
            ),
            precip_24_hours: precip_total("precip_24_hours", Mib1204::EssPrecipitation24Hours),
        }
    }

    pub fn to_json(&self, map: &mut Map<String, Value>) -> Result<()> {
        insert_json(map, &self.relative_humidity)?;
        insert_json(map, &self.precip_rate)?;
        insert_json(map, &self.precip_situation)?;
        insert_json(map, &self.water_depth)?;
        insert_json(map, &self.snow_depth)?;
        insert_json(map, &self.precip_1_hour)?;
        insert_json(map, &self.precip_3_hours)?;
        insert_json(map, &self.precip_6_hours)?;
        insert_json(map, &self.precip_12_hours)?;
        insert_json(map, &self.precip_24_hours)
    }
}

impl Default for PrecipitationValues {
    fn default() -> Self {
        Self::new()
    }
}
