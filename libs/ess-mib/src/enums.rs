//! Enumerated NTCIP 1204 values
//!
//! Raw integers map directly to ordinals. Most enums reserve their low
//! ordinals for `undefined` / `other` / `unknown`; `is_valid` tells whether a
//! decoded value carries real information.

use std::fmt;

/// Enumerated object value
pub trait EssEnumType: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// All values in ordinal order
    const VALUES: &'static [Self];

    fn ordinal(self) -> i32;

    /// MIB label, e.g. `"partlyCloudy"`
    fn label(self) -> &'static str;

    fn from_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::VALUES.get(i).copied())
    }

    /// Defined, non-placeholder value
    fn is_valid(self) -> bool {
        self.ordinal() > 0
    }
}

macro_rules! ess_enum {
    (@define $(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(EssEnumType::label(*self))
            }
        }
    };
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? } valid($v:ident) => $valid:expr;) => {
        ess_enum!(@define $(#[$meta])* $name { $($variant => $label),+ });

        impl EssEnumType for $name {
            const VALUES: &'static [Self] = &[$($name::$variant,)+];

            fn ordinal(self) -> i32 {
                self as i32
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            fn is_valid(self) -> bool {
                let $v = self;
                $valid
            }
        }
    };
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        ess_enum!(@define $(#[$meta])* $name { $($variant => $label),+ });

        impl EssEnumType for $name {
            const VALUES: &'static [Self] = &[$($name::$variant,)+];

            fn ordinal(self) -> i32 {
                self as i32
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }
    };
}

ess_enum! {
    /// Cloud cover
    CloudSituation {
        Undefined => "undefined",
        Overcast => "overcast",
        Cloudy => "cloudy",
        PartlyCloudy => "partlyCloudy",
        MostlyClear => "mostlyClear",
        Clear => "clear",
    }
}

ess_enum! {
    /// Pavement sensor error; `none` means no error was detected
    PavementSensorError {
        Undefined => "undefined",
        Other => "other",
        NoError => "none",
        NoResponse => "noResponse",
        CutCable => "cutCable",
        ShortCircuit => "shortCircuit",
        DirtyLens => "dirtyLens",
    }
    valid(e) => !matches!(e, PavementSensorError::Undefined | PavementSensorError::NoError);
}

ess_enum! {
    PavementSensorType {
        Undefined => "undefined",
        Other => "other",
        ContactPassive => "contactPassive",
        ContactActive => "contactActive",
        Infrared => "infrared",
        Radar => "radar",
        Vibrating => "vibrating",
        Microwave => "microwave",
        Laser => "laser",
    }
}

ess_enum! {
    PavementType {
        Undefined => "undefined",
        Other => "other",
        Unknown => "unknown",
        Asphalt => "asphalt",
        OpenGradedAsphalt => "openGradedAsphalt",
        Concrete => "concrete",
        SteelBridge => "steelBridge",
        ConcreteBridge => "concreteBridge",
        AsphaltOverlayBridge => "asphaltOverlayBridge",
        TimberBridge => "timberBridge",
    }
    valid(t) => !matches!(t, PavementType::Undefined | PavementType::Unknown);
}

ess_enum! {
    PrecipSituation {
        Undefined => "undefined",
        Other => "other",
        Unknown => "unknown",
        NoPrecipitation => "noPrecipitation",
        UnidentifiedSlight => "unidentifiedSlight",
        UnidentifiedModerate => "unidentifiedModerate",
        UnidentifiedHeavy => "unidentifiedHeavy",
        SnowSlight => "snowSlight",
        SnowModerate => "snowModerate",
        SnowHeavy => "snowHeavy",
        RainSlight => "rainSlight",
        RainModerate => "rainModerate",
        RainHeavy => "rainHeavy",
        FrozenPrecipitationSlight => "frozenPrecipitationSlight",
        FrozenPrecipitationModerate => "frozenPrecipitationModerate",
        FrozenPrecipitationHeavy => "frozenPrecipitationHeavy",
    }
    valid(s) => !matches!(s, PrecipSituation::Undefined | PrecipSituation::Unknown);
}

ess_enum! {
    StationMobility {
        Undefined => "undefined",
        Other => "other",
        Permanent => "permanent",
        Transportable => "transportable",
        Mobile => "mobile",
    }
}

ess_enum! {
    /// How the station collects data; `automatic` is ordinal 0
    StationType {
        Automatic => "automatic",
        Staffed => "staffed",
        Reserved => "reserved",
        MissingValue => "missingValue",
    }
    valid(t) => t != StationType::MissingValue;
}

ess_enum! {
    /// Sub-surface sensor error; `none` means no error was detected
    SubSurfaceSensorError {
        Undefined => "undefined",
        Other => "other",
        NoError => "none",
        NoResponse => "noResponse",
        CutCable => "cutCable",
        ShortCircuit => "shortCircuit",
    }
    valid(e) => !matches!(e, SubSurfaceSensorError::Undefined | SubSurfaceSensorError::NoError);
}

ess_enum! {
    SubSurfaceType {
        Undefined => "undefined",
        Other => "other",
        Unknown => "unknown",
        Concrete => "concrete",
        Asphalt => "asphalt",
        OpenGradedAsphalt => "openGradedAsphalt",
        Gravel => "gravel",
        Clay => "clay",
        Loam => "loam",
        Sand => "sand",
        Permafrost => "permafrost",
        VariousAggregates => "variousAggregates",
        Air => "air",
    }
    valid(t) => !matches!(t, SubSurfaceType::Undefined | SubSurfaceType::Unknown);
}

ess_enum! {
    SurfaceBlackIceSignal {
        Undefined => "undefined",
        Other => "other",
        NoIce => "noIce",
        BlackIce => "blackIce",
        DetectorError => "detectorError",
    }
}

ess_enum! {
    SurfaceStatus {
        Undefined => "undefined",
        Other => "other",
        Error => "error",
        Dry => "dry",
        TraceMoisture => "traceMoisture",
        Wet => "wet",
        ChemicallyWet => "chemicallyWet",
        IceWarning => "iceWarning",
        IceWatch => "iceWatch",
        SnowWarning => "snowWarning",
        SnowWatch => "snowWatch",
        Absorption => "absorption",
        Dew => "dew",
        Frost => "frost",
        AbsorptionAtDewpoint => "absorptionAtDewpoint",
    }
}

ess_enum! {
    VisibilitySituation {
        Undefined => "undefined",
        Other => "other",
        Unknown => "unknown",
        Clear => "clear",
        FogNotPatchy => "fogNotPatchy",
        PatchyFog => "patchyFog",
        BlowingSnow => "blowingSnow",
        Smoke => "smoke",
        SeaSpray => "seaSpray",
        VehicleSpray => "vehicleSpray",
        BlowingDustOrSand => "blowingDustOrSand",
        SunGlare => "sunGlare",
        SwarmOfInsects => "swarmOfInsects",
    }
    valid(s) => !matches!(s, VisibilitySituation::Undefined | VisibilitySituation::Unknown);
}

ess_enum! {
    WindSituation {
        Undefined => "undefined",
        Other => "other",
        Unknown => "unknown",
        Calm => "calm",
        LightBreeze => "lightBreeze",
        ModerateBreeze => "moderateBreeze",
        StrongBreeze => "strongBreeze",
        Gale => "gale",
        ModerateGale => "moderateGale",
        StrongGale => "strongGale",
        StormWinds => "stormWinds",
        HurricaneForceWinds => "hurricaneForceWinds",
        GustyWinds => "gustyWinds",
    }
    valid(s) => !matches!(s, WindSituation::Undefined | WindSituation::Unknown);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_follow_declaration_order() {
        assert_eq!(CloudSituation::Clear.ordinal(), 5);
        assert_eq!(SurfaceStatus::from_ordinal(5), Some(SurfaceStatus::Wet));
        assert_eq!(SurfaceStatus::from_ordinal(15), None);
        assert_eq!(SurfaceStatus::from_ordinal(-1), None);
        assert_eq!(PrecipSituation::VALUES.len(), 16);
    }

    #[test]
    fn test_default_validity_excludes_undefined() {
        assert!(!CloudSituation::Undefined.is_valid());
        assert!(CloudSituation::Overcast.is_valid());
        assert!(SurfaceStatus::Other.is_valid());
    }

    #[test]
    fn test_unknown_is_excluded() {
        assert!(!PavementType::Unknown.is_valid());
        assert!(PavementType::Other.is_valid());
        assert!(!WindSituation::Unknown.is_valid());
        assert!(!VisibilitySituation::Unknown.is_valid());
        assert!(!SubSurfaceType::Unknown.is_valid());
        assert!(PrecipSituation::RainSlight.is_valid());
    }

    #[test]
    fn test_sensor_error_none_is_not_an_error() {
        assert!(!PavementSensorError::NoError.is_valid());
        assert!(PavementSensorError::DirtyLens.is_valid());
        assert_eq!(PavementSensorError::NoError.to_string(), "none");
        assert!(!SubSurfaceSensorError::NoError.is_valid());
        assert!(SubSurfaceSensorError::NoResponse.is_valid());
    }

    #[test]
    fn test_station_type_zero_is_valid() {
        assert_eq!(StationType::from_ordinal(0), Some(StationType::Automatic));
        assert!(StationType::Automatic.is_valid());
        assert!(!StationType::MissingValue.is_valid());
    }
}
