use serde::{Deserialize, Serialize};

/// Time interval units, by their length in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnits {
    Milliseconds,
    Deciseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl IntervalUnits {
    /// Seconds per unit
    pub fn factor(self) -> f64 {
        match self {
            IntervalUnits::Milliseconds => 0.001,
            IntervalUnits::Deciseconds => 0.1,
            IntervalUnits::Seconds => 1.0,
            IntervalUnits::Minutes => 60.0,
            IntervalUnits::Hours => 3_600.0,
            IntervalUnits::Days => 86_400.0,
            IntervalUnits::Weeks => 604_800.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            IntervalUnits::Milliseconds => "ms",
            IntervalUnits::Deciseconds => "ds",
            IntervalUnits::Seconds => "s",
            IntervalUnits::Minutes => "min",
            IntervalUnits::Hours => "h",
            IntervalUnits::Days => "d",
            IntervalUnits::Weeks => "wk",
        }
    }
}

linear_quantity!(
    /// Elapsed time, such as minutes of sunshine
    Interval,
    IntervalUnits
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quantity;

    #[test]
    fn test_minutes_and_hours() {
        let i = Interval::new(90.0, IntervalUnits::Minutes);
        assert!((i.value_in(IntervalUnits::Hours) - 1.5).abs() < 1e-9);
        assert_eq!(i.round(IntervalUnits::Seconds), 5_400);
    }
}
