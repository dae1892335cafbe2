use std::cell::OnceCell;
use std::fmt;

use ess_comlink::WireValue;
use ess_units::{
    Angle, AngleUnits, Distance, DistanceUnits, Interval, IntervalUnits, Pressure,
    PressureUnits, Quantity, Speed, SpeedUnits, Temperature, TemperatureUnits,
};
use serde_json::Value;

use super::{json_number, round_digits, write_fixed, EssConvertible, RawInteger, MAX_WORD};
use crate::{Mib1204, Result};

/// A scale factor applied to a unit, e.g. tenths of a degree Celsius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSpec<U> {
    pub scale: f64,
    pub units: U,
}

impl<U> UnitSpec<U> {
    pub const fn new(scale: f64, units: U) -> Self {
        Self { scale, units }
    }
}

/// Wire defaults of a physical quantity
pub trait MeasureDefaults: Quantity {
    /// Valid raw window `[min, max)`; `max` is the missing sentinel
    fn range() -> (i32, i32) {
        (0, MAX_WORD)
    }

    /// How one raw step is interpreted
    fn source() -> UnitSpec<Self::Units>;

    /// How the value is reported
    fn output() -> UnitSpec<Self::Units> {
        UnitSpec::new(1.0, Self::source().units)
    }

    fn digits() -> usize {
        0
    }
}

impl MeasureDefaults for Temperature {
    fn range() -> (i32, i32) {
        (-1000, 1001)
    }

    fn source() -> UnitSpec<TemperatureUnits> {
        UnitSpec::new(0.1, TemperatureUnits::Celsius)
    }

    fn output() -> UnitSpec<TemperatureUnits> {
        UnitSpec::new(1.0, TemperatureUnits::Celsius)
    }

    fn digits() -> usize {
        2
    }
}

impl MeasureDefaults for Distance {
    fn range() -> (i32, i32) {
        (-1000, 1001)
    }

    fn source() -> UnitSpec<DistanceUnits> {
        UnitSpec::new(1.0, DistanceUnits::Meters)
    }
}

impl MeasureDefaults for Speed {
    fn source() -> UnitSpec<SpeedUnits> {
        UnitSpec::new(0.1, SpeedUnits::Mps)
    }

    fn output() -> UnitSpec<SpeedUnits> {
        UnitSpec::new(1.0, SpeedUnits::Mps)
    }

    fn digits() -> usize {
        1
    }
}

impl MeasureDefaults for Angle {
    fn range() -> (i32, i32) {
        (0, 361)
    }

    fn source() -> UnitSpec<AngleUnits> {
        UnitSpec::new(1.0, AngleUnits::Degrees)
    }
}

impl MeasureDefaults for Pressure {
    fn source() -> UnitSpec<PressureUnits> {
        UnitSpec::new(0.1, PressureUnits::Millibars)
    }

    fn output() -> UnitSpec<PressureUnits> {
        UnitSpec::new(1.0, PressureUnits::Pascals)
    }
}

impl MeasureDefaults for Interval {
    fn range() -> (i32, i32) {
        (0, 1441)
    }

    fn source() -> UnitSpec<IntervalUnits> {
        UnitSpec::new(1.0, IntervalUnits::Minutes)
    }
}

pub type EssTemperature = EssMeasure<Temperature>;
pub type EssDistance = EssMeasure<Distance>;
pub type EssSpeed = EssMeasure<Speed>;
pub type EssAngle = EssMeasure<Angle>;
pub type EssPressure = EssMeasure<Pressure>;
pub type EssInterval = EssMeasure<Interval>;

/// Ranged raw integer interpreted as a physical quantity
///
/// The raw value is never modified by conversion: the quantity is built as
/// `raw × source.scale` in source units, then expressed in output units and
/// divided by the output scale.
#[derive(Debug, Clone)]
pub struct EssMeasure<Q: MeasureDefaults> {
    raw: RawInteger,
    source: UnitSpec<Q::Units>,
    output: UnitSpec<Q::Units>,
    digits: usize,
    value: OnceCell<Option<Q>>,
}

impl<Q: MeasureDefaults> EssMeasure<Q> {
    pub fn new(name: &'static str, object: Mib1204) -> Self {
        let (min, max) = Q::range();
        let mut raw = RawInteger::new(name, object);
        raw.set_range(min, max);
        Self {
            raw,
            source: Q::source(),
            output: Q::output(),
            digits: Q::digits(),
            value: OnceCell::new(),
        }
    }

    pub fn for_row(mut self, row: u32) -> Self {
        self.raw.set_row(row);
        self
    }

    pub fn with_range(mut self, min: i32, max: i32) -> Self {
        self.raw.set_range(min, max);
        self
    }

    pub fn with_range_missing(mut self, min: i32, max: i32, missing: Option<i32>) -> Self {
        self.raw.set_range_missing(min, max, missing);
        self
    }

    /// Source and output both become `scale × units`
    pub fn with_units(mut self, scale: f64, units: Q::Units) -> Self {
        self.source = UnitSpec::new(scale, units);
        self.output = UnitSpec::new(scale, units);
        self
    }

    pub fn with_output(mut self, scale: f64, units: Q::Units, digits: usize) -> Self {
        self.output = UnitSpec::new(scale, units);
        self.digits = digits;
        self
    }

    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    /// Memoized quantity in source units
    pub fn get(&self) -> Option<Q> {
        *self.value.get_or_init(|| {
            self.raw
                .ranged()
                .map(|r| Q::new(f64::from(r) * self.source.scale, self.source.units))
        })
    }

    /// Override the decoded quantity
    pub fn set_value(&mut self, value: Option<Q>) {
        self.value = OnceCell::from(value);
    }

    pub fn raw(&self) -> i32 {
        self.raw.raw()
    }

    pub fn set_raw(&mut self, raw: i32) {
        self.raw.set_raw(raw);
        self.value = OnceCell::new();
    }

    pub fn source(&self) -> UnitSpec<Q::Units> {
        self.source
    }

    pub fn output(&self) -> UnitSpec<Q::Units> {
        self.output
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Value in output units and scale
    pub fn value(&self) -> Option<f64> {
        self.get()
            .map(|q| q.value_in(self.output.units) / self.output.scale)
    }

    /// Output value rounded to the configured digits
    pub fn rounded(&self) -> Option<f64> {
        self.value().map(|v| round_digits(v, self.digits))
    }

    /// Output value rounded to a whole number
    pub fn integer(&self) -> Option<i32> {
        self.value().map(|v| v.round() as i32)
    }

    /// Value in arbitrary units, rounded to a whole number
    pub fn integer_in(&self, units: Q::Units) -> Option<i32> {
        self.get().map(|q| q.value_in(units).round() as i32)
    }
}

impl<Q: MeasureDefaults> EssConvertible for EssMeasure<Q> {
    fn name(&self) -> &'static str {
        self.raw.name()
    }

    fn object(&self) -> Mib1204 {
        self.raw.object()
    }

    fn row(&self) -> Option<u32> {
        self.raw.row()
    }

    fn load(&mut self, value: &WireValue) -> Result<()> {
        self.value = OnceCell::new();
        self.raw.load(value)
    }

    fn reset(&mut self) {
        self.raw.reset();
        self.value = OnceCell::new();
    }

    fn is_null(&self) -> bool {
        self.get().is_none()
    }

    fn to_double(&self) -> Result<Option<f64>> {
        Ok(self.value())
    }

    fn to_json(&self) -> Result<Option<Value>> {
        self.value().map(|v| json_number(v, self.digits)).transpose()
    }
}

impl<Q: MeasureDefaults> fmt::Display for EssMeasure<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.value(), self.digits)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn surface_temp(raw: i64) -> EssTemperature {
        let mut t = EssTemperature::new("surface_temp", Mib1204::EssSurfaceTemperature).for_row(1);
        t.load(&WireValue::Integer(raw)).unwrap();
        t
    }

    #[test]
    fn test_tenths_celsius() {
        let t = surface_temp(205);
        assert_eq!(t.to_double().unwrap(), Some(20.5));
        assert_eq!(t.to_string(), "20.50");
        assert_eq!(t.to_integer().unwrap(), Some(21));
        assert_eq!(t.to_json().unwrap(), Some(serde_json::json!(20.5)));
    }

    #[test]
    fn test_out_of_range_temperature_is_null() {
        let t = surface_temp(9999);
        assert_eq!(t.to_integer().unwrap(), None);
        assert_eq!(t.to_json().unwrap(), None);
        assert!(t.is_null());
        assert_eq!(t.to_string(), "");
    }

    #[test]
    fn test_temperature_window_edges() {
        assert_eq!(surface_temp(-1000).value(), Some(-100.0));
        assert_eq!(surface_temp(1000).integer(), Some(100));
        assert_eq!(surface_temp(1001).value(), None);
    }

    #[test]
    fn test_memoized_quantity_is_stable() {
        let t = surface_temp(-57);
        let first = t.get();
        assert_eq!(first, t.get());
        assert_eq!(t.integer_in(TemperatureUnits::Fahrenheit), Some(22));
    }

    #[test]
    fn test_pressure_output_units() {
        let mut p = EssPressure::new("atmospheric_pressure", Mib1204::EssAtmosphericPressure);
        p.load(&WireValue::Integer(10132)).unwrap();
        assert_eq!(p.integer(), Some(101_320));
        // back through the inverse scale
        let raw = (f64::from(p.integer().unwrap()) / 100.0 / 0.1).round() as i32;
        assert_eq!(raw, 10132);
    }

    #[test]
    fn test_speed_one_digit() {
        let mut s = EssSpeed::new("avg_speed", Mib1204::EssAvgWindSpeed);
        s.load(&WireValue::Integer(57)).unwrap();
        assert!((s.value().unwrap() - 5.7).abs() < 1e-9);
        assert_eq!(s.to_string(), "5.7");
        assert_eq!(s.integer_in(SpeedUnits::Kph), Some(21));
    }

    #[test]
    fn test_distance_source_and_output_units() {
        let mut d = EssDistance::new("ice_or_water_depth", Mib1204::EssSurfaceIceOrWaterDepth)
            .with_units(0.1, DistanceUnits::Millimeters)
            .with_output(1.0, DistanceUnits::Meters, 4)
            .with_range(0, MAX_WORD);
        d.load(&WireValue::Integer(25)).unwrap();
        assert!((d.value().unwrap() - 0.0025).abs() < 1e-12);
        assert_eq!(d.to_string(), "0.0025");
        assert_eq!(d.raw(), 25);
    }

    #[test]
    fn test_interval_and_angle_defaults() {
        let mut sun = EssInterval::new("total_sun", Mib1204::EssTotalSun);
        sun.load(&WireValue::Integer(1440)).unwrap();
        assert_eq!(sun.integer(), Some(1440));
        assert_eq!(sun.integer_in(IntervalUnits::Hours), Some(24));
        sun.load(&WireValue::Integer(1441)).unwrap();
        assert_eq!(sun.integer(), None);

        let mut dir = EssAngle::new("avg_direction", Mib1204::EssAvgWindDirection);
        dir.load(&WireValue::Integer(360)).unwrap();
        assert_eq!(dir.integer(), Some(360));
        dir.load(&WireValue::Integer(361)).unwrap();
        assert_eq!(dir.integer(), None);
    }

    #[test]
    fn test_reset_returns_to_missing() {
        let mut t = surface_temp(100);
        assert!(!t.is_null());
        t.reset();
        assert!(t.is_null());
        assert_eq!(t.raw(), 1001);
    }
}
