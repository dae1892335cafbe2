use std::fmt;

/// A physical quantity with a unit-aware value
pub trait Quantity: Copy + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Unit system of this quantity
    type Units: Copy + fmt::Debug + PartialEq + Send + Sync + 'static;

    fn new(value: f64, units: Self::Units) -> Self;

    /// Value in the units the quantity was created with
    fn value(&self) -> f64;

    fn units(&self) -> Self::Units;

    /// Value expressed in other units
    fn value_in(&self, units: Self::Units) -> f64;

    /// Same quantity, expressed in other units
    fn convert(&self, units: Self::Units) -> Self {
        Self::new(self.value_in(units), units)
    }

    /// Value in other units, rounded to the nearest integer
    fn round(&self, units: Self::Units) -> i64 {
        self.value_in(units).round() as i64
    }
}

/// Quantity whose units all share one base unit by a constant factor
macro_rules! linear_quantity {
    ($(#[$meta:meta])* $name:ident, $units:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            value: f64,
            units: $units,
        }

        impl $name {
            pub const fn new(value: f64, units: $units) -> Self {
                Self { value, units }
            }
        }

        impl $crate::Quantity for $name {
            type Units = $units;

            fn new(value: f64, units: $units) -> Self {
                Self { value, units }
            }

            fn value(&self) -> f64 {
                self.value
            }

            fn units(&self) -> $units {
                self.units
            }

            fn value_in(&self, units: $units) -> f64 {
                if units == self.units {
                    self.value
                } else {
                    self.value * self.units.factor() / units.factor()
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.value, self.units.symbol())
            }
        }
    };
}
