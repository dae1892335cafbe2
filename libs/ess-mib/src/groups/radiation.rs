use ess_units::IntervalUnits;
use serde_json::{Map, Value};

use crate::convert::{insert_json, EssConvertible, EssEnum, EssInterval, EssNumber};
use crate::enums::CloudSituation;
use crate::{Mib1204, Result};

/// Sunshine, cloud cover and radiation
///
/// Older firmware reports a single solar radiation value; newer firmware
/// reports instantaneous and accumulated radiation separately.
#[derive(Debug, Clone)]
pub struct RadiationValues {
    /// Minutes of sunshine today
    pub total_sun: EssInterval,
    pub cloud_situation: EssEnum<CloudSituation>,
    pub instantaneous_terrestrial: EssNumber,
    pub instantaneous_solar: EssNumber,
    pub total_radiation: EssNumber,
    /// Accumulation period of `total_radiation`, seconds
    pub total_radiation_period: EssInterval,
    pub solar_radiation: EssNumber,
}

impl RadiationValues {
    pub fn new() -> Self {
        Self {
            total_sun: EssInterval::new("total_sun", Mib1204::EssTotalSun),
            cloud_situation: EssEnum::new("cloud_situation", Mib1204::EssCloudSituation),
            instantaneous_terrestrial: EssNumber::radiation(
                "instantaneous_terrestrial_radiation",
                Mib1204::EssInstantaneousTerrestrialRadiation,
            ),
            instantaneous_solar: EssNumber::radiation(
                "instantaneous_solar_radiation",
                Mib1204::EssInstantaneousSolarRadiation,
            ),
            total_radiation: EssNumber::radiation("total_radiation", Mib1204::EssTotalRadiation),
            total_radiation_period: EssInterval::new(
                "total_radiation_period",
                Mib1204::EssTotalRadiationPeriod,
            )
            .with_units(1.0, IntervalUnits::Seconds)
            .with_range_missing(0, 86_401, Some(0)),
            solar_radiation: EssNumber::radiation("solar_radiation", Mib1204::EssSolarRadiation),
        }
    }

    pub fn to_json(&self, map: &mut Map<String, Value>) -> Result<()> {
        insert_json(map, &self.total_sun)?;
        insert_json(map, &self.cloud_situation)?;
        if self.solar_radiation.is_null() {
            insert_json(map, &self.instantaneous_terrestrial)?;
            insert_json(map, &self.instantaneous_solar)?;
            insert_json(map, &self.total_radiation)?;
            insert_json(map, &self.total_radiation_period)
        } else {
            insert_json(map, &self.solar_radiation)
        }
    }
}

impl Default for RadiationValues {
    fn default() -> Self {
        Self::new()
    }
}
