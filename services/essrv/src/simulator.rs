//! In-memory ESS device
//!
//! [`EssSimulator`] answers get-requests from an object map shared between
//! clones, so a test can keep a handle while the poller owns the link. Any
//! requested object missing from the map answers "no such name".

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use ess_comlink::{ComLinkError, GetRequest, GetResponse, ObjectId, Transport, WireValue};
use ess_mib::Mib1204;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::EssrvError;

/// Canned device firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimProfile {
    /// Legacy wind scalars, pavement V1 water depth, legacy solar radiation
    NtcipV1,
    /// Wind table, pavement V2 without friction, V2 radiation
    NtcipV2,
    /// Every object including pavement friction
    NtcipV4,
    /// Surface readings only on pavement rows 3 and 4
    HighSierra,
}

impl SimProfile {
    pub const ALL: &'static [SimProfile] = &[
        SimProfile::NtcipV1,
        SimProfile::NtcipV2,
        SimProfile::NtcipV4,
        SimProfile::HighSierra,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SimProfile::NtcipV1 => "ntcip_v1",
            SimProfile::NtcipV2 => "ntcip_v2",
            SimProfile::NtcipV4 => "ntcip_v4",
            SimProfile::HighSierra => "high_sierra",
        }
    }

    /// System description reported by the firmware
    pub fn sys_descr(self) -> &'static str {
        match self {
            SimProfile::NtcipV1 => "RWIS RPU NTCIP 1204 v01",
            SimProfile::NtcipV2 => "RWIS RPU NTCIP 1204 v02",
            SimProfile::NtcipV4 => "RWIS RPU NTCIP 1204 v04",
            SimProfile::HighSierra => "High Sierra Electronics ESS configurable on 1965",
        }
    }

    /// Object map of a device running this firmware
    pub fn objects(self) -> ObjectMap {
        let mut map = ObjectMap::default();
        map.station();
        map.atmosphere();
        map.temperatures();
        map.precipitation();
        map.radiation_totals();
        match self {
            SimProfile::NtcipV1 => {
                map.wind_scalars();
                map.pavement(2, PavementLevel::V1);
                map.sub_surface(false);
                map.int(Mib1204::EssSolarRadiation, 410);
            },
            SimProfile::NtcipV2 => {
                map.wind_scalars();
                map.wind_table();
                map.pavement(2, PavementLevel::V2);
                map.sub_surface(true);
                map.radiation_v2();
            },
            SimProfile::NtcipV4 => {
                map.wind_scalars();
                map.wind_table();
                map.pavement(2, PavementLevel::V4);
                map.sub_surface(true);
                map.radiation_v2();
                map.int(Mib1204::EssMobileFriction, 55);
            },
            SimProfile::HighSierra => {
                map.wind_scalars();
                map.wind_table();
                map.high_sierra_pavement();
                map.sub_surface(true);
                map.row_int(Mib1204::EssSubSurfaceSensorError, 1, 4);
                map.radiation_v2();
            },
        }
        map
    }
}

impl fmt::Display for SimProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimProfile {
    type Err = EssrvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimProfile::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                EssrvError::config(format!(
                    "unknown simulator profile '{}', expected one of: {}",
                    s,
                    SimProfile::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PavementLevel {
    V1,
    V2,
    V4,
}

/// Object values of a simulated device
#[derive(Debug, Clone, Default)]
pub struct ObjectMap {
    values: HashMap<ObjectId, WireValue>,
}

impl ObjectMap {
    pub fn int(&mut self, object: Mib1204, value: i64) {
        self.values
            .insert(object.oid(None), WireValue::Integer(value));
    }

    pub fn row_int(&mut self, object: Mib1204, row: u32, value: i64) {
        self.values
            .insert(object.oid(Some(row)), WireValue::Integer(value));
    }

    pub fn text(&mut self, object: Mib1204, row: Option<u32>, value: &str) {
        self.values.insert(
            object.oid(row),
            WireValue::OctetString(Bytes::copy_from_slice(value.as_bytes())),
        );
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn station(&mut self) {
        self.text(Mib1204::EssNtcipSiteDescription, None, "Donner Summit EB");
        self.int(Mib1204::EssTypeofStation, 0);
        self.int(Mib1204::EssStationMobility, 2);
        self.int(Mib1204::EssDoorStatus, 0);
        self.int(Mib1204::EssBatteryStatus, 95);
        self.int(Mib1204::EssLineVolts, 60);
    }

    fn atmosphere(&mut self) {
        self.int(Mib1204::EssReferenceHeight, 2160);
        self.int(Mib1204::EssPressureHeight, 2);
        self.int(Mib1204::EssAtmosphericPressure, 7820);
        self.int(Mib1204::EssVisibility, 20_000);
        self.int(Mib1204::EssVisibilitySituation, 3);
    }

    fn wind_scalars(&mut self) {
        self.int(Mib1204::EssWindSensorHeight, 10);
        self.int(Mib1204::EssAvgWindSpeed, 40);
        self.int(Mib1204::EssAvgWindDirection, 260);
        self.int(Mib1204::EssSpotWindSpeed, 50);
        self.int(Mib1204::EssSpotWindDirection, 255);
        self.int(Mib1204::EssMaxWindGustSpeed, 85);
        self.int(Mib1204::EssMaxWindGustDir, 275);
        self.int(Mib1204::EssWindSituation, 5);
    }

    fn wind_table(&mut self) {
        self.int(Mib1204::WindSensorTableNumSensors, 1);
        self.row_int(Mib1204::WindSensorHeight, 1, 10);
        self.row_int(Mib1204::WindSensorAvgSpeed, 1, 42);
        self.row_int(Mib1204::WindSensorAvgDirection, 1, 270);
        self.row_int(Mib1204::WindSensorSpotSpeed, 1, 51);
        self.row_int(Mib1204::WindSensorSpotDirection, 1, 265);
        self.row_int(Mib1204::WindSensorGustSpeed, 1, 88);
        self.row_int(Mib1204::WindSensorGustDirection, 1, 280);
        self.row_int(Mib1204::WindSensorSituation, 1, 5);
    }

    fn temperatures(&mut self) {
        self.int(Mib1204::EssNumTemperatureSensors, 2);
        self.row_int(Mib1204::EssTemperatureSensorHeight, 1, 2);
        self.row_int(Mib1204::EssAirTemperature, 1, -52);
        self.row_int(Mib1204::EssTemperatureSensorHeight, 2, 10);
        self.row_int(Mib1204::EssAirTemperature, 2, -48);
        self.int(Mib1204::EssWetbulbTemp, -60);
        self.int(Mib1204::EssDewpointTemp, -81);
        self.int(Mib1204::EssMaxTemp, -20);
        self.int(Mib1204::EssMinTemp, -91);
    }

    fn precipitation(&mut self) {
        self.int(Mib1204::EssRelativeHumidity, 78);
        self.int(Mib1204::EssWaterDepth, 0);
        self.int(Mib1204::EssAdjacentSnowDepth, 45);
        self.int(Mib1204::EssPrecipRate, 10);
        self.int(Mib1204::EssPrecipSituation, 8);
        self.int(Mib1204::EssPrecipitationOneHour, 25);
        self.int(Mib1204::EssPrecipitationThreeHours, 60);
        self.int(Mib1204::EssPrecipitationSixHours, 110);
        self.int(Mib1204::EssPrecipitationTwelveHours, 180);
        self.int(Mib1204::EssPrecipitation24Hours, 260);
    }

    fn pavement_settings(&mut self, row: u32, location: &str) {
        self.text(Mib1204::EssPavementSensorLocation, Some(row), location);
        self.row_int(Mib1204::EssPavementType, row, 3);
        self.row_int(Mib1204::EssPavementElevation, row, 0);
        self.row_int(Mib1204::EssPavementExposure, row, 90);
        self.row_int(Mib1204::EssPavementSensorType, row, 2);
    }

    fn pavement(&mut self, count: u32, level: PavementLevel) {
        self.int(Mib1204::NumEssPavementSensors, i64::from(count));
        for row in 1..=count {
            let offset = i64::from(row - 1);
            self.pavement_settings(row, &format!("Lane {}", row));
            self.row_int(Mib1204::EssSurfaceStatus, row, if row == 1 { 5 } else { 3 });
            self.row_int(Mib1204::EssSurfaceTemperature, row, -12 + 16 * offset);
            self.row_int(Mib1204::EssPavementTemperature, row, 13 + 8 * offset);
            self.row_int(Mib1204::EssSurfaceFreezePoint, row, -38);
            self.row_int(Mib1204::EssPavementSensorError, row, 2);
            self.row_int(Mib1204::EssSurfaceSalinity, row, 120);
            self.row_int(Mib1204::EssSurfaceBlackIceSignal, row, 2);
            match level {
                PavementLevel::V1 => {
                    self.row_int(Mib1204::EssSurfaceWaterDepth, row, 1);
                },
                PavementLevel::V2 | PavementLevel::V4 => {
                    self.row_int(Mib1204::EssSurfaceIceOrWaterDepth, row, 8);
                    self.row_int(Mib1204::EssSurfaceConductivityV2, row, 450);
                    self.row_int(Mib1204::PavementSensorModelInformation, row, 3);
                    self.row_int(Mib1204::PavementSensorTemperatureDepth, row, 5);
                },
            }
            if level == PavementLevel::V4 {
                self.row_int(Mib1204::PavementSensorSurfaceFriction, row, 62 - 10 * offset);
            }
        }
    }

    fn high_sierra_pavement(&mut self) {
        self.pavement(4, PavementLevel::V2);
        // Rows 1 and 2 are placeholders on this firmware
        for row in 1..=2 {
            self.row_int(Mib1204::EssSurfaceStatus, row, 0);
            self.row_int(Mib1204::EssSurfaceTemperature, row, 1001);
            self.row_int(Mib1204::EssPavementTemperature, row, 1001);
            self.row_int(Mib1204::EssSurfaceFreezePoint, row, 1001);
            self.row_int(Mib1204::EssPavementSensorError, row, 3);
        }
        self.row_int(Mib1204::EssSurfaceStatus, 3, 7);
        self.row_int(Mib1204::EssSurfaceTemperature, 3, -31);
    }

    fn sub_surface(&mut self, moisture: bool) {
        self.int(Mib1204::NumEssSubSurfaceSensors, 1);
        self.text(Mib1204::EssSubSurfaceSensorLocation, Some(1), "Subgrade");
        self.row_int(Mib1204::EssSubSurfaceType, 1, 6);
        self.row_int(Mib1204::EssSubSurfaceSensorDepth, 1, 45);
        self.row_int(Mib1204::EssSubSurfaceTemperature, 1, 18);
        self.row_int(Mib1204::EssSubSurfaceSensorError, 1, 2);
        if moisture {
            self.row_int(Mib1204::EssSubSurfaceMoisture, 1, 30);
        }
    }

    fn radiation_totals(&mut self) {
        self.int(Mib1204::EssTotalSun, 340);
        self.int(Mib1204::EssCloudSituation, 3);
    }

    fn radiation_v2(&mut self) {
        self.int(Mib1204::EssInstantaneousTerrestrialRadiation, -80);
        self.int(Mib1204::EssInstantaneousSolarRadiation, 420);
        self.int(Mib1204::EssTotalRadiation, 1200);
        self.int(Mib1204::EssTotalRadiationPeriod, 3600);
    }
}

#[derive(Debug, Default)]
struct SimState {
    values: HashMap<ObjectId, WireValue>,
    failures: VecDeque<ComLinkError>,
    requests: Vec<GetRequest>,
    delay: Duration,
}

/// Simulated device transport
#[derive(Debug, Clone, Default)]
pub struct EssSimulator {
    state: Arc<Mutex<SimState>>,
}

impl EssSimulator {
    /// Device with no objects
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: SimProfile) -> Self {
        Self::with_objects(profile.objects())
    }

    pub fn with_objects(objects: ObjectMap) -> Self {
        let sim = Self::new();
        sim.state.lock().values = objects.values;
        sim
    }

    pub fn set(&self, oid: ObjectId, value: WireValue) {
        self.state.lock().values.insert(oid, value);
    }

    pub fn set_integer(&self, object: Mib1204, row: Option<u32>, value: i64) {
        self.set(object.oid(row), WireValue::Integer(value));
    }

    /// Make the device stop implementing an object
    pub fn remove(&self, object: Mib1204, row: Option<u32>) {
        self.state.lock().values.remove(&object.oid(row));
    }

    /// Fail the next exchange with `err`
    pub fn fail_next(&self, err: ComLinkError) {
        self.state.lock().failures.push_back(err);
    }

    /// Fail the next `times` exchanges with `err`
    pub fn fail_times(&self, err: ComLinkError, times: usize) {
        let mut state = self.state.lock();
        state
            .failures
            .extend(std::iter::repeat(err).take(times));
    }

    /// Delay every answer, e.g. past the link timeout
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().delay = delay;
    }

    pub fn exchange_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<GetRequest> {
        self.state.lock().requests.clone()
    }

    /// Whether any request asked for `object`
    pub fn was_queried(&self, object: Mib1204, row: Option<u32>) -> bool {
        let oid = object.oid(row);
        self.state
            .lock()
            .requests
            .iter()
            .any(|r| r.objects().contains(&oid))
    }
}

#[async_trait]
impl Transport for EssSimulator {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn exchange(&mut self, request: &GetRequest) -> ess_comlink::Result<GetResponse> {
        let delay = {
            let mut state = self.state.lock();
            state.requests.push(request.clone());
            if let Some(err) = state.failures.pop_front() {
                return Err(err);
            }
            state.delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock();
        let values = request
            .objects()
            .iter()
            .map(|oid| {
                state
                    .values
                    .get(oid)
                    .cloned()
                    .ok_or_else(|| ComLinkError::no_such_name(oid.clone()))
            })
            .collect::<ess_comlink::Result<Vec<_>>>()?;
        Ok(GetResponse::new(values))
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str() {
        assert_eq!("ntcip_v4".parse::<SimProfile>().unwrap(), SimProfile::NtcipV4);
        let err = "ntcip_v9".parse::<SimProfile>().unwrap_err();
        assert!(err.to_string().contains("ntcip_v9"));
    }

    #[test]
    fn test_profiles_differ() {
        let v1 = SimProfile::NtcipV1.objects();
        let v4 = SimProfile::NtcipV4.objects();
        assert!(v4.len() > v1.len());
        assert!(!v1.is_empty());
    }

    #[tokio::test]
    async fn test_answers_known_objects() {
        let mut sim = EssSimulator::with_profile(SimProfile::NtcipV2);
        let request = GetRequest::new(vec![
            Mib1204::EssAtmosphericPressure.oid(None),
            Mib1204::EssAirTemperature.oid(Some(2)),
        ]);
        let response = sim.exchange(&request).await.unwrap();
        assert_eq!(
            response.values(),
            &[WireValue::Integer(7820), WireValue::Integer(-48)]
        );
        assert_eq!(sim.exchange_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_object_is_no_such_name() {
        let mut sim = EssSimulator::with_profile(SimProfile::NtcipV2);
        let request = GetRequest::new(vec![
            Mib1204::EssAtmosphericPressure.oid(None),
            Mib1204::PavementSensorSurfaceFriction.oid(Some(1)),
        ]);
        let err = sim.exchange(&request).await.unwrap_err();
        assert!(err.is_object_not_supported());
    }

    #[tokio::test]
    async fn test_injected_failures_come_first() {
        let mut sim = EssSimulator::with_profile(SimProfile::NtcipV4);
        sim.fail_times(ComLinkError::timeout("no answer"), 2);
        let request = GetRequest::new(vec![Mib1204::EssTotalSun.oid(None)]);
        assert!(sim.exchange(&request).await.is_err());
        assert!(sim.exchange(&request).await.is_err());
        assert!(sim.exchange(&request).await.is_ok());
        assert!(sim.was_queried(Mib1204::EssTotalSun, None));
    }
}
