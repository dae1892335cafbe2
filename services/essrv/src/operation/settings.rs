//! Settings query of a weather sensor
//!
//! Reads the station configuration: instrumentation, elevation and the
//! mounting details of each sensor table. The station type is derived from
//! `sysDescr` when the operation starts.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ess_comlink::{ComLinkError, CommLink};
use ess_mib::{EssConvertible, EssRec, EssType, SensorModel};
use tracing::{debug, error, info};

use super::ess::{query_many, OpEss, QueryOutcome};
use super::{Operation, PollStatus, PriorityLevel};
use crate::device::{Controller, SharedSensor};

pub const OP_QUERY_ESS_SETTINGS: &str = "query_ess_settings";

/// One exchange of the settings operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPhase {
    Instrument,
    Elevation,
    WindCount,
    WindRow(u32),
    WindV1,
    TemperatureCount,
    TemperatureRow(u32),
    PavementCount,
    PavementRow(u32),
    SubSurfaceCount,
    SubSurfaceRow(u32),
}

impl fmt::Display for SettingsPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsPhase::WindRow(n) => write!(f, "WindRow.{}", n),
            SettingsPhase::TemperatureRow(n) => write!(f, "TemperatureRow.{}", n),
            SettingsPhase::PavementRow(n) => write!(f, "PavementRow.{}", n),
            SettingsPhase::SubSurfaceRow(n) => write!(f, "SubSurfaceRow.{}", n),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl SettingsPhase {
    pub fn objects(self, rec: &mut EssRec) -> Vec<&mut dyn EssConvertible> {
        match self {
            SettingsPhase::Instrument => objects![
                rec.instrument.description,
                rec.instrument.station_type,
                rec.instrument.mobility,
                rec.instrument.door_open,
                rec.instrument.battery,
                rec.instrument.line_volts,
            ],
            SettingsPhase::Elevation => objects![
                rec.atmospheric.reference_elevation,
                rec.atmospheric.pressure_sensor_height,
            ],
            SettingsPhase::WindCount => {
                vec![rec.wind.table.sensor_count_mut() as &mut dyn EssConvertible]
            },
            SettingsPhase::WindRow(n) => match rec.wind.table.ensure_row(n) {
                Some(row) => objects![row.height],
                None => Vec::new(),
            },
            SettingsPhase::WindV1 => objects![rec.wind.height],
            SettingsPhase::TemperatureCount => {
                vec![rec.temperature.table.sensor_count_mut() as &mut dyn EssConvertible]
            },
            SettingsPhase::TemperatureRow(n) => match rec.temperature.table.ensure_row(n) {
                Some(row) => objects![row.height],
                None => Vec::new(),
            },
            SettingsPhase::PavementCount => {
                vec![rec.pavement.table.sensor_count_mut() as &mut dyn EssConvertible]
            },
            SettingsPhase::PavementRow(n) => rec
                .pavement
                .table
                .ensure_row(n)
                .map(|row| row.settings_objects())
                .unwrap_or_default(),
            SettingsPhase::SubSurfaceCount => {
                vec![rec.sub_surface.table.sensor_count_mut() as &mut dyn EssConvertible]
            },
            SettingsPhase::SubSurfaceRow(n) => rec
                .sub_surface
                .table
                .ensure_row(n)
                .map(|row| row.settings_objects())
                .unwrap_or_default(),
        }
    }

    /// Phase following this one, or `None` when the operation is done
    pub fn next(self, outcome: QueryOutcome, rec: &EssRec) -> Option<Self> {
        let unsupported = outcome == QueryOutcome::NotSupported;
        let next = match self {
            SettingsPhase::Instrument => SettingsPhase::Elevation,
            SettingsPhase::Elevation => SettingsPhase::WindCount,
            SettingsPhase::WindCount => {
                if unsupported {
                    SettingsPhase::WindV1
                } else {
                    next_row(
                        rec.wind.table.is_done(),
                        rec.wind.table.next_row_number(),
                        SettingsPhase::WindRow,
                        SettingsPhase::TemperatureCount,
                    )
                }
            },
            SettingsPhase::WindRow(_) if unsupported => SettingsPhase::TemperatureCount,
            SettingsPhase::WindRow(_) => next_row(
                rec.wind.table.is_done(),
                rec.wind.table.next_row_number(),
                SettingsPhase::WindRow,
                SettingsPhase::TemperatureCount,
            ),
            SettingsPhase::WindV1 => SettingsPhase::TemperatureCount,
            SettingsPhase::TemperatureRow(_) if unsupported => SettingsPhase::PavementCount,
            SettingsPhase::TemperatureCount | SettingsPhase::TemperatureRow(_) => next_row(
                rec.temperature.table.is_done(),
                rec.temperature.table.next_row_number(),
                SettingsPhase::TemperatureRow,
                SettingsPhase::PavementCount,
            ),
            SettingsPhase::PavementRow(_) if unsupported => SettingsPhase::SubSurfaceCount,
            SettingsPhase::PavementCount | SettingsPhase::PavementRow(_) => next_row(
                rec.pavement.table.is_done(),
                rec.pavement.table.next_row_number(),
                SettingsPhase::PavementRow,
                SettingsPhase::SubSurfaceCount,
            ),
            SettingsPhase::SubSurfaceRow(_) if unsupported => return None,
            SettingsPhase::SubSurfaceCount | SettingsPhase::SubSurfaceRow(_) => {
                if rec.sub_surface.table.is_done() {
                    return None;
                }
                SettingsPhase::SubSurfaceRow(rec.sub_surface.table.next_row_number())
            },
        };
        Some(next)
    }
}

fn next_row(
    done: bool,
    number: u32,
    row: fn(u32) -> SettingsPhase,
    after: SettingsPhase,
) -> SettingsPhase {
    if done {
        after
    } else {
        row(number)
    }
}

/// Query the configuration of one sensor
pub struct OpQueryEssSettings {
    base: OpEss,
    rec: EssRec,
    phase: Option<SettingsPhase>,
    started: bool,
}

impl OpQueryEssSettings {
    pub fn new(
        sensor: SharedSensor,
        controller: Arc<Controller>,
        priority: PriorityLevel,
        retry_threshold: u32,
    ) -> Self {
        Self {
            base: OpEss::new(sensor, controller, priority, retry_threshold),
            rec: EssRec::new(),
            phase: Some(SettingsPhase::Instrument),
            started: false,
        }
    }

    pub fn record(&self) -> &EssRec {
        &self.rec
    }

    fn start(&mut self) {
        let mut sensor = self.base.sensor().write();
        let ess_type = EssType::from_sys_descr(sensor.sys_descr());
        sensor.set_ess_type_notify(ess_type);
        debug!("{}: station type {}", self.base.device(), ess_type.as_str());
    }
}

#[async_trait]
impl Operation for OpQueryEssSettings {
    fn name(&self) -> &str {
        OP_QUERY_ESS_SETTINGS
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
        if !self.started {
            self.start();
            self.started = true;
        }
        let Some(phase) = self.phase else {
            return Ok(PollStatus::Done);
        };
        let outcome = {
            let mut objects = phase.objects(&mut self.rec);
            query_many(link, self.base.device(), &mut objects).await?
        };
        debug!("{}: {} {:?}", self.base.device(), phase, outcome);

        self.phase = phase.next(outcome, &self.rec);
        Ok(match self.phase {
            Some(_) => PollStatus::Continue,
            None => PollStatus::Done,
        })
    }

    fn handle_comm_error(&mut self, err: &ComLinkError) {
        self.base.handle_comm_error(OP_QUERY_ESS_SETTINGS, err);
    }

    fn cleanup(&mut self, success: bool) {
        if success {
            match self.rec.to_json() {
                Ok(json) => {
                    self.base.sensor().write().set_settings_notify(Some(json));
                    info!("{}: settings query complete", self.base.device());
                },
                Err(e) => error!(
                    "{}: ESS settings serialization failed: {}",
                    self.base.device(),
                    e
                ),
            }
        }
        self.base
            .controller()
            .complete_operation(OP_QUERY_ESS_SETTINGS, success);
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use ess_comlink::WireValue;

    #[test]
    fn test_scalar_phases() {
        let rec = EssRec::new();
        assert_eq!(
            SettingsPhase::Instrument.next(QueryOutcome::NotSupported, &rec),
            Some(SettingsPhase::Elevation)
        );
        assert_eq!(
            SettingsPhase::Elevation.next(QueryOutcome::Ok, &rec),
            Some(SettingsPhase::WindCount)
        );
        assert_eq!(
            SettingsPhase::WindCount.next(QueryOutcome::NotSupported, &rec),
            Some(SettingsPhase::WindV1)
        );
        assert_eq!(
            SettingsPhase::WindV1.next(QueryOutcome::Ok, &rec),
            Some(SettingsPhase::TemperatureCount)
        );
    }

    #[test]
    fn test_empty_tables_finish() {
        let rec = EssRec::new();
        assert_eq!(
            SettingsPhase::TemperatureCount.next(QueryOutcome::Ok, &rec),
            Some(SettingsPhase::PavementCount)
        );
        assert_eq!(
            SettingsPhase::PavementCount.next(QueryOutcome::Ok, &rec),
            Some(SettingsPhase::SubSurfaceCount)
        );
        assert_eq!(SettingsPhase::SubSurfaceCount.next(QueryOutcome::Ok, &rec), None);
    }

    #[test]
    fn test_pavement_rows() {
        let mut rec = EssRec::new();
        rec.pavement
            .table
            .sensor_count_mut()
            .load(&WireValue::Integer(2))
            .unwrap();

        let first = SettingsPhase::PavementCount.next(QueryOutcome::Ok, &rec);
        assert_eq!(first, Some(SettingsPhase::PavementRow(1)));
        assert_eq!(SettingsPhase::PavementRow(1).objects(&mut rec).len(), 5);
        assert_eq!(
            SettingsPhase::PavementRow(1).next(QueryOutcome::Ok, &rec),
            Some(SettingsPhase::PavementRow(2))
        );
        assert_eq!(
            SettingsPhase::PavementRow(2).next(QueryOutcome::NotSupported, &rec),
            Some(SettingsPhase::SubSurfaceCount)
        );
    }

    #[test]
    fn test_sub_surface_row_unsupported_ends() {
        let rec = EssRec::new();
        assert_eq!(SettingsPhase::SubSurfaceRow(1).next(QueryOutcome::NotSupported, &rec), None);
    }
}
