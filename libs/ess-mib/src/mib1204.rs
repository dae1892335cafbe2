//! NTCIP 1204 object identifiers
//!
//! All objects live under the `ess` node. Scalars are addressed with a
//! trailing `.0`; table columns take the 1-based row index instead.

use ess_comlink::ObjectId;

/// `iso.org.dod.internet.private.enterprises.nema.transportation.devices.ess`
pub const ESS_NODE: &[u32] = &[1, 3, 6, 1, 4, 1, 1206, 4, 2, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Scalar,
    Column,
}

macro_rules! mib1204 {
    ($($variant:ident => $name:literal, [$($arc:literal),+], $kind:ident;)+) => {
        /// Queryable ESS objects
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Mib1204 {
            $($variant,)+
        }

        impl Mib1204 {
            pub const ALL: &'static [Mib1204] = &[$(Mib1204::$variant,)+];

            /// MIB object name
            pub fn name(self) -> &'static str {
                match self {
                    $(Mib1204::$variant => $name,)+
                }
            }

            fn arcs(self) -> &'static [u32] {
                match self {
                    $(Mib1204::$variant => &[$($arc),+],)+
                }
            }

            fn kind(self) -> ObjectKind {
                match self {
                    $(Mib1204::$variant => ObjectKind::$kind,)+
                }
            }
        }
    };
}

mib1204! {
    // Station identity and instrumentation
    EssTypeofStation => "essTypeofStation", [1, 2], Scalar;
    EssStationMobility => "essStationMobility", [1, 3], Scalar;
    EssNtcipSiteDescription => "essNtcipSiteDescription", [2, 2], Scalar;
    EssDoorStatus => "essDoorStatus", [15, 2], Scalar;
    EssBatteryStatus => "essBatteryStatus", [15, 3], Scalar;
    EssLineVolts => "essLineVolts", [15, 4], Scalar;

    // Elevation and pressure
    EssAtmosphericPressure => "essAtmosphericPressure", [4, 1], Scalar;
    EssReferenceHeight => "essReferenceHeight", [4, 4], Scalar;
    EssPressureHeight => "essPressureHeight", [4, 5], Scalar;

    // Wind, legacy scalars
    EssWindSensorHeight => "essWindSensorHeight", [4, 6], Scalar;
    EssAvgWindDirection => "essAvgWindDirection", [6, 1], Scalar;
    EssAvgWindSpeed => "essAvgWindSpeed", [6, 2], Scalar;
    EssMaxWindGustSpeed => "essMaxWindGustSpeed", [6, 3], Scalar;
    EssMaxWindGustDir => "essMaxWindGustDir", [6, 4], Scalar;
    EssWindSituation => "essWindSituation", [6, 5], Scalar;
    EssSpotWindDirection => "essSpotWindDirection", [6, 8], Scalar;
    EssSpotWindSpeed => "essSpotWindSpeed", [6, 9], Scalar;

    // Wind sensor table
    WindSensorTableNumSensors => "windSensorTableNumSensors", [6, 10], Scalar;
    WindSensorHeight => "windSensorHeight", [6, 11, 1, 2], Column;
    WindSensorAvgSpeed => "windSensorAvgSpeed", [6, 11, 1, 4], Column;
    WindSensorAvgDirection => "windSensorAvgDirection", [6, 11, 1, 5], Column;
    WindSensorSpotSpeed => "windSensorSpotSpeed", [6, 11, 1, 6], Column;
    WindSensorSpotDirection => "windSensorSpotDirection", [6, 11, 1, 7], Column;
    WindSensorGustSpeed => "windSensorGustSpeed", [6, 11, 1, 8], Column;
    WindSensorGustDirection => "windSensorGustDirection", [6, 11, 1, 9], Column;
    WindSensorSituation => "windSensorSituation", [6, 11, 1, 10], Column;

    // Temperature
    EssNumTemperatureSensors => "essNumTemperatureSensors", [5, 1], Scalar;
    EssTemperatureSensorHeight => "essTemperatureSensorHeight", [5, 2, 1, 2], Column;
    EssAirTemperature => "essAirTemperature", [5, 2, 1, 3], Column;
    EssWetbulbTemp => "essWetbulbTemp", [5, 4], Scalar;
    EssDewpointTemp => "essDewpointTemp", [5, 5], Scalar;
    EssMaxTemp => "essMaxTemp", [5, 6], Scalar;
    EssMinTemp => "essMinTemp", [5, 7], Scalar;

    // Precipitation
    EssRelativeHumidity => "essRelativeHumidity", [7, 1], Scalar;
    EssWaterDepth => "essWaterDepth", [7, 2], Scalar;
    EssAdjacentSnowDepth => "essAdjacentSnowDepth", [7, 3], Scalar;
    EssPrecipRate => "essPrecipRate", [7, 7], Scalar;
    EssPrecipSituation => "essPrecipSituation", [7, 9], Scalar;
    EssPrecipitationOneHour => "essPrecipitationOneHour", [7, 11], Scalar;
    EssPrecipitationThreeHours => "essPrecipitationThreeHours", [7, 12], Scalar;
    EssPrecipitationSixHours => "essPrecipitationSixHours", [7, 13], Scalar;
    EssPrecipitationTwelveHours => "essPrecipitationTwelveHours", [7, 14], Scalar;
    EssPrecipitation24Hours => "essPrecipitation24Hours", [7, 15], Scalar;

    // Visibility
    EssVisibility => "essVisibility", [8, 1], Scalar;
    EssVisibilitySituation => "essVisibilitySituation", [8, 4], Scalar;

    // Radiation
    EssSolarRadiation => "essSolarRadiation", [9, 1], Scalar;
    EssTotalSun => "essTotalSun", [9, 2], Scalar;
    EssCloudSituation => "essCloudSituation", [9, 3], Scalar;
    EssInstantaneousTerrestrialRadiation => "essInstantaneousTerrestrialRadiation", [9, 4], Scalar;
    EssInstantaneousSolarRadiation => "essInstantaneousSolarRadiation", [9, 5], Scalar;
    EssTotalRadiation => "essTotalRadiation", [9, 6], Scalar;
    EssTotalRadiationPeriod => "essTotalRadiationPeriod", [9, 7], Scalar;

    // Pavement sensor table
    NumEssPavementSensors => "numEssPavementSensors", [10, 1], Scalar;
    EssPavementSensorLocation => "essPavementSensorLocation", [10, 2, 1, 2], Column;
    EssPavementType => "essPavementType", [10, 2, 1, 3], Column;
    EssPavementElevation => "essPavementElevation", [10, 2, 1, 4], Column;
    EssPavementExposure => "essPavementExposure", [10, 2, 1, 5], Column;
    EssPavementSensorType => "essPavementSensorType", [10, 2, 1, 6], Column;
    EssSurfaceStatus => "essSurfaceStatus", [10, 2, 1, 7], Column;
    EssSurfaceTemperature => "essSurfaceTemperature", [10, 2, 1, 8], Column;
    EssPavementTemperature => "essPavementTemperature", [10, 2, 1, 9], Column;
    EssSurfaceWaterDepth => "essSurfaceWaterDepth", [10, 2, 1, 10], Column;
    EssSurfaceSalinity => "essSurfaceSalinity", [10, 2, 1, 11], Column;
    EssSurfaceFreezePoint => "essSurfaceFreezePoint", [10, 2, 1, 13], Column;
    EssSurfaceBlackIceSignal => "essSurfaceBlackIceSignal", [10, 2, 1, 14], Column;
    EssPavementSensorError => "essPavementSensorError", [10, 2, 1, 15], Column;
    EssSurfaceIceOrWaterDepth => "essSurfaceIceOrWaterDepth", [10, 2, 1, 16], Column;
    EssSurfaceConductivityV2 => "essSurfaceConductivityV2", [10, 2, 1, 17], Column;
    PavementSensorModelInformation => "pavementSensorModelInformation", [10, 2, 1, 18], Column;
    PavementSensorTemperatureDepth => "pavementSensorTemperatureDepth", [10, 2, 1, 19], Column;
    PavementSensorSurfaceFriction => "pavementSensorSurfaceFriction", [10, 2, 1, 20], Column;

    // Sub-surface sensor table
    NumEssSubSurfaceSensors => "numEssSubSurfaceSensors", [10, 3], Scalar;
    EssSubSurfaceSensorLocation => "essSubSurfaceSensorLocation", [10, 4, 1, 2], Column;
    EssSubSurfaceType => "essSubSurfaceType", [10, 4, 1, 3], Column;
    EssSubSurfaceSensorDepth => "essSubSurfaceSensorDepth", [10, 4, 1, 4], Column;
    EssSubSurfaceTemperature => "essSubSurfaceTemperature", [10, 4, 1, 5], Column;
    EssSubSurfaceMoisture => "essSubSurfaceMoisture", [10, 4, 1, 6], Column;
    EssSubSurfaceSensorError => "essSubSurfaceSensorError", [10, 4, 1, 7], Column;

    // Mobile platform
    EssMobileFriction => "essMobileFriction", [16, 1], Scalar;
}

impl Mib1204 {
    pub fn is_column(self) -> bool {
        self.kind() == ObjectKind::Column
    }

    /// Full identifier, with `.0` for scalars or the row index for columns
    pub fn oid(self, row: Option<u32>) -> ObjectId {
        let node = ObjectId::from_slice(ESS_NODE).extend(self.arcs());
        match (self.kind(), row) {
            (ObjectKind::Column, Some(row)) => node.child(row),
            _ => node.child(0),
        }
    }

    /// Object name with its row index, e.g. `essSurfaceTemperature.2`
    pub fn label(self, row: Option<u32>) -> String {
        match row {
            Some(row) => format!("{}.{}", self.name(), row),
            None => self.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scalar_oid() {
        assert_eq!(
            Mib1204::EssAtmosphericPressure.oid(None).to_string(),
            "1.3.6.1.4.1.1206.4.2.5.4.1.0"
        );
    }

    #[test]
    fn test_column_oid_takes_row() {
        assert_eq!(
            Mib1204::EssSurfaceTemperature.oid(Some(3)).to_string(),
            "1.3.6.1.4.1.1206.4.2.5.10.2.1.8.3"
        );
        assert_eq!(
            Mib1204::EssSurfaceTemperature.label(Some(3)),
            "essSurfaceTemperature.3"
        );
    }

    #[test]
    fn test_identifiers_are_unique() {
        let oids: HashSet<_> = Mib1204::ALL.iter().map(|m| m.oid(Some(1))).collect();
        assert_eq!(oids.len(), Mib1204::ALL.len());
        let names: HashSet<_> = Mib1204::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), Mib1204::ALL.len());
    }
}
