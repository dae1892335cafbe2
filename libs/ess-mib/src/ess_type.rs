use std::fmt;

use serde::{Deserialize, Serialize};

/// Firmware fingerprint of the High Sierra ESS controller
const HIGH_SIERRA_DESCR: &str = "ESS configurable on 1965";

/// Vendor family of a station, detected from its system description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EssType {
    #[default]
    Unknown,
    Generic,
    /// Reports surface readings on pavement rows 3 and 4
    HighSierra,
}

impl EssType {
    pub fn from_sys_descr(sys_descr: Option<&str>) -> Self {
        match sys_descr {
            None => EssType::Unknown,
            Some(d) if d.contains(HIGH_SIERRA_DESCR) => EssType::HighSierra,
            Some(_) => EssType::Generic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EssType::Unknown => "unknown",
            EssType::Generic => "generic",
            EssType::HighSierra => "high_sierra",
        }
    }
}

impl fmt::Display for EssType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
