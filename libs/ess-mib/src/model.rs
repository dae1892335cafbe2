//! Long-lived device model fed by each polling cycle
//!
//! Every setter takes `None` for "currently unreported" and only notifies
//! listeners when the stored value actually changes.

use chrono::{DateTime, Utc};

use crate::EssType;

/// Receiver of decoded ESS values
///
/// Units: temperatures in whole °C, distances and heights in meters (water
/// and snow depth in centimeters), speeds in m/s, directions in whole
/// degrees, percentages 0-100, precipitation in mm and mm/h, situation codes
/// as enum ordinals.
pub trait SensorModel: Send {
    fn ess_type(&self) -> EssType;
    fn set_ess_type_notify(&mut self, ess_type: EssType);

    /// Time of the committed sample
    fn set_stamp_notify(&mut self, stamp: DateTime<Utc>);
    /// Diagnostic JSON of the last settings read
    fn set_settings_notify(&mut self, settings: Option<String>);
    /// Diagnostic JSON of the last status poll
    fn set_sample_notify(&mut self, sample: Option<String>);

    // Atmospheric
    fn set_pressure_notify(&mut self, pascals: Option<i32>);
    fn set_visibility_notify(&mut self, meters: Option<i32>);
    fn set_visibility_situation_notify(&mut self, situation: Option<i32>);
    fn set_pressure_sensor_height_notify(&mut self, meters: Option<i32>);
    fn set_elevation_notify(&mut self, meters: Option<i32>);

    // Wind
    fn set_wind_speed_notify(&mut self, mps: Option<f64>);
    fn set_wind_dir_notify(&mut self, degrees: Option<i32>);
    fn set_spot_wind_speed_notify(&mut self, mps: Option<f64>);
    fn set_spot_wind_dir_notify(&mut self, degrees: Option<i32>);
    fn set_gust_speed_notify(&mut self, mps: Option<f64>);
    fn set_gust_dir_notify(&mut self, degrees: Option<i32>);

    // Temperature
    fn set_air_temp_notify(&mut self, celsius: Option<i32>);
    fn set_dew_point_temp_notify(&mut self, celsius: Option<i32>);
    fn set_max_temp_notify(&mut self, celsius: Option<i32>);
    fn set_min_temp_notify(&mut self, celsius: Option<i32>);

    // Precipitation
    fn set_water_depth_notify(&mut self, centimeters: Option<i32>);
    fn set_adjacent_snow_depth_notify(&mut self, centimeters: Option<i32>);
    fn set_humidity_notify(&mut self, percent: Option<i32>);
    fn set_precip_rate_notify(&mut self, mm_per_hour: Option<f64>);
    fn set_precip_situation_notify(&mut self, situation: Option<i32>);
    fn set_precip_one_hour_notify(&mut self, mm: Option<f64>);
    fn set_precip_3_hour_notify(&mut self, mm: Option<f64>);
    fn set_precip_6_hour_notify(&mut self, mm: Option<f64>);
    fn set_precip_12_hour_notify(&mut self, mm: Option<f64>);
    fn set_precip_24_hour_notify(&mut self, mm: Option<f64>);

    // Pavement
    fn set_surf_temp_notify(&mut self, celsius: Option<i32>);
    fn set_pvmt_temp_notify(&mut self, celsius: Option<i32>);
    fn set_surf_freeze_temp_notify(&mut self, celsius: Option<i32>);
    fn set_pvmt_surf_status_notify(&mut self, status: Option<i32>);
    fn set_pvmt_friction_notify(&mut self, percent: Option<i32>);

    // Sub-surface
    fn set_sub_surf_temp_notify(&mut self, celsius: Option<i32>);

    // Radiation
    fn set_cloud_cover_situation_notify(&mut self, situation: Option<i32>);
    fn set_total_sun_notify(&mut self, minutes: Option<i32>);
}
