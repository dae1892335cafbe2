use serde::{Deserialize, Serialize};

/// Pressure units, by their value in pascals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnits {
    Pascals,
    Microbars,
    Millibars,
    Hectopascals,
    Centibars,
    Kilopascals,
    InchesOfMercury,
    Decibars,
    Bars,
    Megapascals,
}

impl PressureUnits {
    /// Pascals per unit
    pub fn factor(self) -> f64 {
        match self {
            PressureUnits::Pascals => 1.0,
            PressureUnits::Microbars => 10.0,
            PressureUnits::Millibars | PressureUnits::Hectopascals => 100.0,
            PressureUnits::Centibars | PressureUnits::Kilopascals => 1_000.0,
            PressureUnits::InchesOfMercury => 3386.39,
            PressureUnits::Decibars => 10_000.0,
            PressureUnits::Bars => 100_000.0,
            PressureUnits::Megapascals => 1_000_000.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PressureUnits::Pascals => "Pa",
            PressureUnits::Microbars => "µbar",
            PressureUnits::Millibars => "mbar",
            PressureUnits::Hectopascals => "hPa",
            PressureUnits::Centibars => "cbar",
            PressureUnits::Kilopascals => "kPa",
            PressureUnits::InchesOfMercury => "inHg",
            PressureUnits::Decibars => "dbar",
            PressureUnits::Bars => "bar",
            PressureUnits::Megapascals => "MPa",
        }
    }
}

linear_quantity!(
    /// Atmospheric or hydrostatic pressure
    Pressure,
    PressureUnits
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quantity;

    #[test]
    fn test_millibars_to_pascals() {
        let p = Pressure::new(1013.2, PressureUnits::Millibars);
        assert_eq!(p.round(PressureUnits::Pascals), 101_320);
        assert!((p.value_in(PressureUnits::Hectopascals) - 1013.2).abs() < 1e-9);
    }

    #[test]
    fn test_inches_of_mercury() {
        let p = Pressure::new(3386.39, PressureUnits::Pascals);
        assert!((p.value_in(PressureUnits::InchesOfMercury) - 1.0).abs() < 1e-9);
    }
}
