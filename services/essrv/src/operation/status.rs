//! Status polling of a weather sensor
//!
//! The phase graph always tries the richer object set first. Once a device
//! answers "no such name" for an optional object set, the fallback is
//! remembered in [`Fallbacks`] and the richer set is never asked again during
//! this operation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ess_comlink::{ComLinkError, CommLink};
use ess_mib::enums::CloudSituation;
use ess_mib::{EssConvertible, EssRec, SensorModel};
use tracing::{debug, error, info};

use super::ess::{query_many, OpEss, QueryOutcome};
use super::{Operation, PollStatus, PriorityLevel};
use crate::device::{Controller, SharedSensor};

pub const OP_QUERY_ESS_STATUS: &str = "query_ess_status";

/// Fallbacks discovered while walking the status phases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fallbacks {
    /// Only the legacy wind scalars are queried
    pub wind_v1_only: bool,
    /// Pavement V2 objects are unsupported
    pub pavement_v1: bool,
    /// Pavement friction is unsupported
    pub friction_unsupported: bool,
    /// Sub-surface moisture is unsupported
    pub moisture_unsupported: bool,
}

/// One exchange of the status operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPhase {
    Elevation,
    Pressure,
    Visibility,
    WindCount,
    WindRow(u32),
    WindV1,
    TemperatureSensors,
    TemperatureRow(u32),
    Precipitation,
    PrecipTotals,
    SnowDepth,
    PavementCount,
    PavementRow(u32),
    PavementRowV2(u32),
    PavementRowV1(u32),
    PavementRowV4(u32),
    MobileFriction,
    SubSurfaceCount,
    SubSurfaceRow(u32),
    SubSurfaceMoisture(u32),
    TotalSun,
    CloudSituation,
    RadiationV2,
    RadiationV1,
}

impl fmt::Display for StatusPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPhase::WindRow(n)
            | StatusPhase::TemperatureRow(n)
            | StatusPhase::PavementRow(n)
            | StatusPhase::PavementRowV2(n)
            | StatusPhase::PavementRowV1(n)
            | StatusPhase::PavementRowV4(n)
            | StatusPhase::SubSurfaceRow(n)
            | StatusPhase::SubSurfaceMoisture(n) => {
                let name = format!("{:?}", self);
                let base = name.split('(').next().unwrap_or_default();
                write!(f, "{}.{}", base, n)
            },
            _ => write!(f, "{:?}", self),
        }
    }
}

impl StatusPhase {
    /// Objects queried by this phase
    ///
    /// Row phases add their row on first use; a full table yields nothing.
    pub fn objects(self, rec: &mut EssRec) -> Vec<&mut dyn EssConvertible> {
        match self {
            StatusPhase::Elevation => objects![
                rec.atmospheric.reference_elevation,
                rec.atmospheric.pressure_sensor_height,
            ],
            StatusPhase::Pressure => objects![rec.atmospheric.atmospheric_pressure],
            StatusPhase::Visibility => objects![
                rec.atmospheric.visibility,
                rec.atmospheric.visibility_situation,
            ],
            StatusPhase::WindCount => {
                vec![rec.wind.table.sensor_count_mut() as &mut dyn EssConvertible]
            },
            StatusPhase::WindRow(n) => match rec.wind.table.ensure_row(n) {
                Some(row) => objects![
                    row.avg_speed,
                    row.avg_direction,
                    row.spot_speed,
                    row.spot_direction,
                    row.gust_speed,
                    row.gust_direction,
                ],
                None => Vec::new(),
            },
            StatusPhase::WindV1 => objects![
                rec.wind.avg_speed,
                rec.wind.avg_direction,
                rec.wind.spot_speed,
                rec.wind.spot_direction,
                rec.wind.gust_speed,
                rec.wind.gust_direction,
            ],
            StatusPhase::TemperatureSensors => {
                let temps = &mut rec.temperature;
                let mut objects =
                    vec![temps.table.sensor_count_mut() as &mut dyn EssConvertible];
                objects.push(&mut temps.wet_bulb_temp);
                objects.push(&mut temps.dew_point_temp);
                objects.push(&mut temps.max_air_temp);
                objects.push(&mut temps.min_air_temp);
                objects
            },
            StatusPhase::TemperatureRow(n) => match rec.temperature.table.ensure_row(n) {
                Some(row) => objects![row.air_temp],
                None => Vec::new(),
            },
            StatusPhase::Precipitation => objects![
                rec.precipitation.water_depth,
                rec.precipitation.relative_humidity,
                rec.precipitation.precip_rate,
                rec.precipitation.precip_situation,
            ],
            StatusPhase::PrecipTotals => objects![
                rec.precipitation.precip_1_hour,
                rec.precipitation.precip_3_hours,
                rec.precipitation.precip_6_hours,
                rec.precipitation.precip_12_hours,
                rec.precipitation.precip_24_hours,
            ],
            StatusPhase::SnowDepth => objects![rec.precipitation.snow_depth],
            StatusPhase::PavementCount => {
                vec![rec.pavement.table.sensor_count_mut() as &mut dyn EssConvertible]
            },
            StatusPhase::PavementRow(n) => rec
                .pavement
                .table
                .ensure_row(n)
                .map(|row| row.status_objects())
                .unwrap_or_default(),
            StatusPhase::PavementRowV2(n) => rec
                .pavement
                .table
                .row_mut(n)
                .map(|row| row.v2_objects())
                .unwrap_or_default(),
            StatusPhase::PavementRowV1(n) => rec
                .pavement
                .table
                .row_mut(n)
                .map(|row| row.v1_objects())
                .unwrap_or_default(),
            StatusPhase::PavementRowV4(n) => match rec.pavement.table.row_mut(n) {
                Some(row) => objects![row.friction],
                None => Vec::new(),
            },
            StatusPhase::MobileFriction => objects![rec.pavement.mobile_friction],
            StatusPhase::SubSurfaceCount => {
                vec![rec.sub_surface.table.sensor_count_mut() as &mut dyn EssConvertible]
            },
            StatusPhase::SubSurfaceRow(n) => rec
                .sub_surface
                .table
                .ensure_row(n)
                .map(|row| row.status_objects())
                .unwrap_or_default(),
            StatusPhase::SubSurfaceMoisture(n) => match rec.sub_surface.table.row_mut(n) {
                Some(row) => objects![row.moisture],
                None => Vec::new(),
            },
            StatusPhase::TotalSun => objects![rec.radiation.total_sun],
            StatusPhase::CloudSituation => objects![rec.radiation.cloud_situation],
            StatusPhase::RadiationV2 => objects![
                rec.radiation.instantaneous_terrestrial,
                rec.radiation.instantaneous_solar,
                rec.radiation.total_radiation,
                rec.radiation.total_radiation_period,
            ],
            StatusPhase::RadiationV1 => objects![rec.radiation.solar_radiation],
        }
    }

    /// Apply the side effects of an outcome to the record
    pub fn settle(self, outcome: QueryOutcome, rec: &mut EssRec, fallbacks: &mut Fallbacks) {
        match (self, outcome) {
            (StatusPhase::WindCount, QueryOutcome::NotSupported) => {
                fallbacks.wind_v1_only = true;
            },
            (StatusPhase::PavementRowV2(_), QueryOutcome::NotSupported) => {
                fallbacks.pavement_v1 = true;
            },
            (StatusPhase::PavementRowV4(n), QueryOutcome::NotSupported) => {
                if let Some(row) = rec.pavement.table.row_mut(n) {
                    row.friction.reset();
                }
                fallbacks.friction_unsupported = true;
            },
            (StatusPhase::MobileFriction, QueryOutcome::Ok) => {
                let raw = rec.pavement.mobile_friction.raw();
                if let Some(row) = rec.pavement.table.row_mut(1) {
                    row.friction.set_raw(raw);
                }
            },
            (StatusPhase::MobileFriction, QueryOutcome::NotSupported) => {
                rec.pavement.mobile_friction.reset();
            },
            (StatusPhase::SubSurfaceRow(n), QueryOutcome::NotSupported) => {
                if let Some(row) = rec.sub_surface.table.row_mut(n) {
                    row.mark_unresponsive();
                }
            },
            (StatusPhase::SubSurfaceMoisture(n), QueryOutcome::NotSupported) => {
                if let Some(row) = rec.sub_surface.table.row_mut(n) {
                    row.moisture.reset();
                }
                fallbacks.moisture_unsupported = true;
            },
            (StatusPhase::CloudSituation, QueryOutcome::NotSupported) => {
                rec.radiation
                    .cloud_situation
                    .set_value(Some(CloudSituation::Clear));
            },
            _ => {},
        }
    }

    /// Phase following this one, or `None` when the operation is done
    pub fn next(self, outcome: QueryOutcome, rec: &EssRec, fallbacks: &Fallbacks) -> Option<Self> {
        let unsupported = outcome == QueryOutcome::NotSupported;
        let next = match self {
            StatusPhase::Elevation => StatusPhase::Pressure,
            StatusPhase::Pressure => StatusPhase::Visibility,
            StatusPhase::Visibility => {
                if fallbacks.wind_v1_only {
                    StatusPhase::WindV1
                } else {
                    StatusPhase::WindCount
                }
            },
            StatusPhase::WindCount => {
                if unsupported {
                    StatusPhase::WindV1
                } else if rec.wind.table.is_done() {
                    StatusPhase::TemperatureSensors
                } else {
                    StatusPhase::WindRow(rec.wind.table.next_row_number())
                }
            },
            StatusPhase::WindRow(_) => {
                if unsupported || rec.wind.table.is_done() {
                    StatusPhase::TemperatureSensors
                } else {
                    StatusPhase::WindRow(rec.wind.table.next_row_number())
                }
            },
            StatusPhase::WindV1 => StatusPhase::TemperatureSensors,
            StatusPhase::TemperatureSensors => next_temperature_row(rec),
            StatusPhase::TemperatureRow(_) => {
                if unsupported {
                    StatusPhase::Precipitation
                } else {
                    next_temperature_row(rec)
                }
            },
            StatusPhase::Precipitation => StatusPhase::PrecipTotals,
            StatusPhase::PrecipTotals => StatusPhase::SnowDepth,
            StatusPhase::SnowDepth => StatusPhase::PavementCount,
            StatusPhase::PavementCount => next_pavement_row(rec),
            StatusPhase::PavementRow(n) => {
                if unsupported {
                    StatusPhase::SubSurfaceCount
                } else if fallbacks.pavement_v1 {
                    StatusPhase::PavementRowV1(n)
                } else {
                    StatusPhase::PavementRowV2(n)
                }
            },
            StatusPhase::PavementRowV2(n) => {
                if unsupported {
                    StatusPhase::PavementRowV1(n)
                } else if fallbacks.friction_unsupported {
                    next_pavement_row(rec)
                } else {
                    StatusPhase::PavementRowV4(n)
                }
            },
            StatusPhase::PavementRowV1(_) => next_pavement_row(rec),
            StatusPhase::PavementRowV4(n) => {
                if unsupported && n == 1 {
                    StatusPhase::MobileFriction
                } else {
                    next_pavement_row(rec)
                }
            },
            StatusPhase::MobileFriction => next_pavement_row(rec),
            StatusPhase::SubSurfaceCount => next_sub_surface_row(rec),
            StatusPhase::SubSurfaceRow(n) => {
                if unsupported {
                    StatusPhase::TotalSun
                } else if fallbacks.moisture_unsupported {
                    next_sub_surface_row(rec)
                } else {
                    StatusPhase::SubSurfaceMoisture(n)
                }
            },
            StatusPhase::SubSurfaceMoisture(_) => next_sub_surface_row(rec),
            StatusPhase::TotalSun => StatusPhase::CloudSituation,
            StatusPhase::CloudSituation => StatusPhase::RadiationV2,
            StatusPhase::RadiationV2 => {
                if unsupported {
                    StatusPhase::RadiationV1
                } else {
                    return None;
                }
            },
            StatusPhase::RadiationV1 => return None,
        };
        Some(next)
    }
}

fn next_temperature_row(rec: &EssRec) -> StatusPhase {
    if rec.temperature.table.is_done() {
        StatusPhase::Precipitation
    } else {
        StatusPhase::TemperatureRow(rec.temperature.table.next_row_number())
    }
}

fn next_pavement_row(rec: &EssRec) -> StatusPhase {
    if rec.pavement.table.is_done() {
        StatusPhase::SubSurfaceCount
    } else {
        StatusPhase::PavementRow(rec.pavement.table.next_row_number())
    }
}

fn next_sub_surface_row(rec: &EssRec) -> StatusPhase {
    if rec.sub_surface.table.is_done() {
        StatusPhase::TotalSun
    } else {
        StatusPhase::SubSurfaceRow(rec.sub_surface.table.next_row_number())
    }
}

/// Query the current weather conditions of one sensor
pub struct OpQueryEssStatus {
    base: OpEss,
    rec: EssRec,
    phase: Option<StatusPhase>,
    fallbacks: Fallbacks,
}

impl OpQueryEssStatus {
    pub fn new(
        sensor: SharedSensor,
        controller: Arc<Controller>,
        priority: PriorityLevel,
        retry_threshold: u32,
    ) -> Self {
        // LX firmware only implements the legacy wind objects
        let wind_v1_only = sensor.read().software_model().contains("LX");
        Self {
            base: OpEss::new(sensor, controller, priority, retry_threshold),
            rec: EssRec::new(),
            phase: Some(StatusPhase::Elevation),
            fallbacks: Fallbacks {
                wind_v1_only,
                ..Fallbacks::default()
            },
        }
    }

    pub fn record(&self) -> &EssRec {
        &self.rec
    }

    pub fn fallbacks(&self) -> Fallbacks {
        self.fallbacks
    }
}

#[async_trait]
impl Operation for OpQueryEssStatus {
    fn name(&self) -> &str {
        OP_QUERY_ESS_STATUS
    }

    fn device(&self) -> &str {
        self.base.device()
    }

    fn priority(&self) -> PriorityLevel {
        self.base.priority()
    }

    fn raise_priority(&mut self, priority: PriorityLevel) {
        self.base.raise_priority(priority);
    }

    fn retry_threshold(&self) -> u32 {
        self.base.retry_threshold()
    }

    fn phase_name(&self) -> String {
        self.phase
            .map_or_else(|| "done".to_string(), |phase| phase.to_string())
    }

    async fn poll(&mut self, link: &mut CommLink) -> Result<PollStatus, ComLinkError> {
        let Some(phase) = self.phase else {
            return Ok(PollStatus::Done);
        };
        let outcome = {
            let mut objects = phase.objects(&mut self.rec);
            query_many(link, self.base.device(), &mut objects).await?
        };
        debug!("{}: {} {:?}", self.base.device(), phase, outcome);

        phase.settle(outcome, &mut self.rec, &mut self.fallbacks);
        self.phase = phase.next(outcome, &self.rec, &self.fallbacks);
        Ok(match self.phase {
            Some(_) => PollStatus::Continue,
            None => PollStatus::Done,
        })
    }

    fn handle_comm_error(&mut self, err: &ComLinkError) {
        self.base.handle_comm_error(OP_QUERY_ESS_STATUS, err);
    }

    fn cleanup(&mut self, success: bool) {
        if success {
            let mut sensor = self.base.sensor().write();
            self.rec.store(&mut *sensor);
            match self.rec.to_json() {
                Ok(json) => sensor.set_sample_notify(Some(json)),
                Err(e) => error!("{}: ESS sample serialization failed: {}", self.base.device(), e),
            }
            info!("{}: status poll complete", self.base.device());
        }
        self.base
            .controller()
            .complete_operation(OP_QUERY_ESS_STATUS, success);
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use ess_comlink::WireValue;

    fn load_count(count: &mut dyn EssConvertible, n: i64) {
        count.load(&WireValue::Integer(n)).unwrap();
    }

    #[test]
    fn test_atmospheric_leads_to_wind_table() {
        let rec = EssRec::new();
        let fallbacks = Fallbacks::default();
        let ok = QueryOutcome::Ok;
        assert_eq!(
            StatusPhase::Elevation.next(ok, &rec, &fallbacks),
            Some(StatusPhase::Pressure)
        );
        assert_eq!(
            StatusPhase::Visibility.next(ok, &rec, &fallbacks),
            Some(StatusPhase::WindCount)
        );
    }

    #[test]
    fn test_lx_firmware_uses_wind_scalars() {
        let rec = EssRec::new();
        let fallbacks = Fallbacks {
            wind_v1_only: true,
            ..Fallbacks::default()
        };
        assert_eq!(
            StatusPhase::Visibility.next(QueryOutcome::Ok, &rec, &fallbacks),
            Some(StatusPhase::WindV1)
        );
    }

    #[test]
    fn test_wind_count_unsupported_falls_back() {
        let mut rec = EssRec::new();
        let mut fallbacks = Fallbacks::default();
        let phase = StatusPhase::WindCount;
        phase.settle(QueryOutcome::NotSupported, &mut rec, &mut fallbacks);
        assert!(fallbacks.wind_v1_only);
        assert_eq!(
            phase.next(QueryOutcome::NotSupported, &rec, &fallbacks),
            Some(StatusPhase::WindV1)
        );
    }

    #[test]
    fn test_wind_rows_follow_count() {
        let mut rec = EssRec::new();
        let fallbacks = Fallbacks::default();
        load_count(rec.wind.table.sensor_count_mut(), 2);

        let mut phase = StatusPhase::WindCount;
        let mut visited = Vec::new();
        while let Some(next) = phase.next(QueryOutcome::Ok, &rec, &fallbacks) {
            if next == StatusPhase::TemperatureSensors {
                break;
            }
            assert!(!next.objects(&mut rec).is_empty());
            visited.push(next);
            phase = next;
        }
        assert_eq!(visited, vec![StatusPhase::WindRow(1), StatusPhase::WindRow(2)]);
        assert_eq!(rec.wind.table.len(), 2);
    }

    #[test]
    fn test_pavement_rows_follow_count() {
        let mut rec = EssRec::new();
        let fallbacks = Fallbacks::default();
        load_count(rec.pavement.table.sensor_count_mut(), 3);

        let mut phase = StatusPhase::PavementCount;
        let mut rows = Vec::new();
        while let Some(next) = phase.next(QueryOutcome::Ok, &rec, &fallbacks) {
            if next == StatusPhase::SubSurfaceCount {
                break;
            }
            assert!(!next.objects(&mut rec).is_empty());
            if matches!(next, StatusPhase::PavementRow(_)) {
                rows.push(next);
            }
            phase = next;
        }
        assert_eq!(
            rows,
            vec![
                StatusPhase::PavementRow(1),
                StatusPhase::PavementRow(2),
                StatusPhase::PavementRow(3),
            ]
        );
        assert_eq!(rec.pavement.table.len(), 3);
    }

    #[test]
    fn test_unsupported_row_stops_growth() {
        let mut rec = EssRec::new();
        let fallbacks = Fallbacks::default();
        load_count(rec.temperature.table.sensor_count_mut(), 3);
        rec.temperature.table.ensure_row(1);
        assert_eq!(
            StatusPhase::TemperatureRow(1).next(QueryOutcome::NotSupported, &rec, &fallbacks),
            Some(StatusPhase::Precipitation)
        );
    }

    #[test]
    fn test_no_temperature_sensors_skips_rows() {
        let rec = EssRec::new();
        let fallbacks = Fallbacks::default();
        assert_eq!(
            StatusPhase::TemperatureSensors.next(QueryOutcome::NotSupported, &rec, &fallbacks),
            Some(StatusPhase::Precipitation)
        );
    }

    #[test]
    fn test_pavement_v2_fallback_is_sticky() {
        let mut rec = EssRec::new();
        let mut fallbacks = Fallbacks::default();
        load_count(rec.pavement.table.sensor_count_mut(), 2);
        rec.pavement.table.ensure_row(1);

        let v2 = StatusPhase::PavementRowV2(1);
        v2.settle(QueryOutcome::NotSupported, &mut rec, &mut fallbacks);
        assert_eq!(
            v2.next(QueryOutcome::NotSupported, &rec, &fallbacks),
            Some(StatusPhase::PavementRowV1(1))
        );
        assert_eq!(
            StatusPhase::PavementRowV1(1).next(QueryOutcome::Ok, &rec, &fallbacks),
            Some(StatusPhase::PavementRow(2))
        );
        rec.pavement.table.ensure_row(2);
        assert_eq!(
            StatusPhase::PavementRow(2).next(QueryOutcome::Ok, &rec, &fallbacks),
            Some(StatusPhase::PavementRowV1(2))
        );
    }

    #[test]
    fn test_friction_unsupported_tries_mobile_on_row_one() {
        let mut rec = EssRec::new();
        let mut fallbacks = Fallbacks::default();
        load_count(rec.pavement.table.sensor_count_mut(), 2);
        let row = rec.pavement.table.ensure_row(1).unwrap();
        row.friction.load(&WireValue::Integer(40)).unwrap();

        let v4 = StatusPhase::PavementRowV4(1);
        v4.settle(QueryOutcome::NotSupported, &mut rec, &mut fallbacks);
        assert!(rec.pavement.table.row(1).unwrap().friction.is_null());
        assert_eq!(
            v4.next(QueryOutcome::NotSupported, &rec, &fallbacks),
            Some(StatusPhase::MobileFriction)
        );

        rec.pavement
            .mobile_friction
            .load(&WireValue::Integer(55))
            .unwrap();
        StatusPhase::MobileFriction.settle(QueryOutcome::Ok, &mut rec, &mut fallbacks);
        assert_eq!(rec.pavement.table.row(1).unwrap().friction.integer(), Some(55));

        // Later rows skip friction entirely
        rec.pavement.table.ensure_row(2);
        assert_eq!(
            StatusPhase::PavementRowV2(2).next(QueryOutcome::Ok, &rec, &fallbacks),
            Some(StatusPhase::SubSurfaceCount)
        );
    }

    #[test]
    fn test_sub_surface_row_unsupported_marks_unresponsive() {
        let mut rec = EssRec::new();
        let mut fallbacks = Fallbacks::default();
        load_count(rec.sub_surface.table.sensor_count_mut(), 2);
        rec.sub_surface.table.ensure_row(1);

        let phase = StatusPhase::SubSurfaceRow(1);
        phase.settle(QueryOutcome::NotSupported, &mut rec, &mut fallbacks);
        let row = rec.sub_surface.table.row(1).unwrap();
        assert_eq!(
            row.sensor_error.get(),
            Some(ess_mib::enums::SubSurfaceSensorError::NoResponse)
        );
        assert_eq!(
            phase.next(QueryOutcome::NotSupported, &rec, &fallbacks),
            Some(StatusPhase::TotalSun)
        );
    }

    #[test]
    fn test_cloud_situation_defaults_to_clear() {
        let mut rec = EssRec::new();
        let mut fallbacks = Fallbacks::default();
        let phase = StatusPhase::CloudSituation;
        phase.settle(QueryOutcome::NotSupported, &mut rec, &mut fallbacks);
        assert_eq!(
            rec.radiation.cloud_situation.get(),
            Some(CloudSituation::Clear)
        );
        assert_eq!(
            phase.next(QueryOutcome::NotSupported, &rec, &fallbacks),
            Some(StatusPhase::RadiationV2)
        );
    }

    #[test]
    fn test_radiation_ends_operation() {
        let rec = EssRec::new();
        let fallbacks = Fallbacks::default();
        assert_eq!(
            StatusPhase::RadiationV2.next(QueryOutcome::NotSupported, &rec, &fallbacks),
            Some(StatusPhase::RadiationV1)
        );
        assert_eq!(StatusPhase::RadiationV2.next(QueryOutcome::Ok, &rec, &fallbacks), None);
        assert_eq!(StatusPhase::RadiationV1.next(QueryOutcome::Ok, &rec, &fallbacks), None);
    }

    #[test]
    fn test_full_table_row_is_skipped() {
        let mut rec = EssRec::new();
        assert!(StatusPhase::WindRow(1).objects(&mut rec).is_empty());
        assert!(StatusPhase::PavementRowV2(3).objects(&mut rec).is_empty());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(StatusPhase::PavementRowV2(3).to_string(), "PavementRowV2.3");
        assert_eq!(StatusPhase::TotalSun.to_string(), "TotalSun");
    }
}
