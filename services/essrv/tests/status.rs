//! Status operation against simulated firmware versions

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

mod common;

use common::Station;
use ess_comlink::ComLinkError;
use ess_mib::{Mib1204, SensorModel};
use essrv::simulator::{EssSimulator, SimProfile};

#[tokio::test]
async fn test_ntcip_v4_full_status() {
    let station = Station::new(SimProfile::NtcipV4);
    station.run(vec![station.status_op(3)]).await;

    {
        let sensor = station.sensor.read();
        let r = sensor.readings();
        assert_eq!(r.pressure, Some(78_200));
        assert_eq!(r.visibility, Some(2000));
        assert_eq!(r.elevation, Some(2160));
        assert_eq!(r.wind_speed, Some(4.2));
        assert_eq!(r.wind_dir, Some(270));
        assert_eq!(r.gust_speed, Some(8.8));
        assert_eq!(r.air_temp, Some(-5));
        assert_eq!(r.dew_point_temp, Some(-8));
        assert_eq!(r.humidity, Some(78));
        assert_eq!(r.precip_rate, Some(3.6));
        assert_eq!(r.precip_one_hour, Some(2.5));
        assert_eq!(r.surf_temp, Some(-1));
        assert_eq!(r.pvmt_temp, Some(1));
        assert_eq!(r.pvmt_surf_status, Some(5));
        assert_eq!(r.pvmt_friction, Some(62));
        assert_eq!(r.sub_surf_temp, Some(2));
        assert_eq!(r.cloud_cover_situation, Some(3));
        assert_eq!(r.total_sun, Some(340));
        assert!(sensor.stamp().is_some());
    }

    let sample = station.sample();
    assert_eq!(sample["pavement_sensor"].as_array().unwrap().len(), 2);
    assert_eq!(sample["pavement_sensor"][1]["friction"], 52);
    assert_eq!(sample["sub_surface_sensor"][0]["moisture"], 30);
    assert_eq!(sample["total_radiation"], 1200);
    assert!(sample.get("solar_radiation").is_none());
    assert_eq!(station.controller.health().completed_operations, 1);
    assert!(!station.sim.was_queried(Mib1204::EssSurfaceWaterDepth, Some(1)));
}

#[tokio::test]
async fn test_ntcip_v1_falls_back() {
    let station = Station::new(SimProfile::NtcipV1);
    station.run(vec![station.status_op(3)]).await;

    {
        let sensor = station.sensor.read();
        let r = sensor.readings();
        assert_eq!(r.wind_speed, Some(4.0));
        assert_eq!(r.wind_dir, Some(260));
        assert_eq!(r.pvmt_friction, None);
        assert_eq!(r.surf_temp, Some(-1));
    }

    let sample = station.sample();
    assert_eq!(sample["pavement_sensor"][0]["surface_water_depth"], 0.001);
    assert!(sample["pavement_sensor"][0].get("ice_or_water_depth").is_none());
    assert!(sample["sub_surface_sensor"][0].get("moisture").is_none());
    assert_eq!(sample["solar_radiation"], 410);

    // V2 objects are only tried on the first row
    assert!(station.sim.was_queried(Mib1204::EssSurfaceIceOrWaterDepth, Some(1)));
    assert!(!station.sim.was_queried(Mib1204::EssSurfaceIceOrWaterDepth, Some(2)));
}

#[tokio::test]
async fn test_lx_firmware_skips_wind_table() {
    let station = Station::with(
        EssSimulator::with_profile(SimProfile::NtcipV4),
        Some(SimProfile::NtcipV4.sys_descr()),
        Some("LX-RPU Elite"),
    );
    station.run(vec![station.status_op(3)]).await;

    assert!(!station.sim.was_queried(Mib1204::WindSensorTableNumSensors, None));
    assert_eq!(station.sensor.read().readings().wind_speed, Some(4.0));
}

#[tokio::test]
async fn test_friction_unsupported_tries_mobile_friction() {
    let station = Station::new(SimProfile::NtcipV2);
    station.run(vec![station.status_op(3)]).await;

    assert!(station.sim.was_queried(Mib1204::EssMobileFriction, None));
    assert!(!station
        .sim
        .was_queried(Mib1204::PavementSensorSurfaceFriction, Some(2)));
    assert_eq!(station.sensor.read().readings().pvmt_friction, None);

    let sample = station.sample();
    assert_eq!(sample["pavement_sensor"][0]["ice_or_water_depth"], 0.0008);
    assert!(sample["pavement_sensor"][0].get("friction").is_none());
}

#[tokio::test]
async fn test_mobile_friction_fills_first_row() {
    let sim = EssSimulator::with_profile(SimProfile::NtcipV2);
    sim.set_integer(Mib1204::EssMobileFriction, None, 48);
    let station = Station::with(sim, Some(SimProfile::NtcipV2.sys_descr()), None);
    station.run(vec![station.status_op(3)]).await;

    assert_eq!(station.sensor.read().readings().pvmt_friction, Some(48));
}

#[tokio::test]
async fn test_high_sierra_uses_rows_three_and_four() {
    let station = Station::new(SimProfile::HighSierra);
    station
        .run(vec![station.settings_op(3), station.status_op(3)])
        .await;

    let sensor = station.sensor.read();
    assert_eq!(sensor.ess_type(), ess_mib::EssType::HighSierra);
    let r = sensor.readings();
    assert_eq!(r.surf_temp, Some(-3));
    assert_eq!(r.pvmt_surf_status, Some(7));
    assert_eq!(r.pvmt_temp, None);
    assert_eq!(r.surf_freeze_temp, None);
    assert_eq!(r.pvmt_friction, None);
    assert_eq!(r.sub_surf_temp, None);
}

#[tokio::test]
async fn test_unsupported_sub_surface_row_marked_unresponsive() {
    let sim = EssSimulator::with_profile(SimProfile::NtcipV4);
    sim.remove(Mib1204::EssSubSurfaceSensorLocation, Some(1));
    let station = Station::with(sim, Some(SimProfile::NtcipV4.sys_descr()), None);
    station.run(vec![station.status_op(3)]).await;

    let sample = station.sample();
    let row = &sample["sub_surface_sensor"][0];
    assert_eq!(row["sensor_error"], "noResponse");
    assert!(row.get("sub_surface_type").is_none());
    assert_eq!(row["active"], true);
    assert!(row.get("temp").is_none());
    assert_eq!(station.sensor.read().readings().sub_surf_temp, None);
    assert!(!station.sim.was_queried(Mib1204::EssSubSurfaceMoisture, Some(1)));
}

#[tokio::test]
async fn test_missing_cloud_situation_reads_clear() {
    let sim = EssSimulator::with_profile(SimProfile::NtcipV4);
    sim.remove(Mib1204::EssCloudSituation, None);
    let station = Station::with(sim, None, None);
    station.run(vec![station.status_op(3)]).await;

    assert_eq!(station.sensor.read().readings().cloud_cover_situation, Some(5));
    assert_eq!(station.sample()["cloud_situation"], "clear");
}

#[tokio::test]
async fn test_comm_error_retries_same_phase() {
    let station = Station::new(SimProfile::NtcipV4);
    station
        .sim
        .fail_times(ComLinkError::checksum("bad frame"), 2);
    station.run(vec![station.status_op(3)]).await;

    let requests = station.sim.requests();
    // Both failed attempts and the retry asked for the first phase
    assert_eq!(requests[0], requests[2]);
    assert!(station.sensor.read().sample().is_some());
    let health = station.controller.health();
    assert_eq!(health.checksum_errors, 2);
    assert_eq!(health.completed_operations, 1);
}

#[tokio::test]
async fn test_retry_threshold_fails_operation() {
    let station = Station::new(SimProfile::NtcipV4);
    station.sim.fail_times(ComLinkError::timeout("no answer"), 5);
    station.run(vec![station.status_op(3)]).await;

    assert_eq!(station.sim.exchange_count(), 3);
    assert!(station.sensor.read().sample().is_none());
    let health = station.controller.health();
    assert_eq!(health.timeout_errors, 3);
    assert_eq!(health.failed_operations, 1);
}
