//! Weather sensor device model
//!
//! Long-lived state of one ESS, updated once per successful poll. Setters
//! only publish an [`AttributeChange`] when the stored value changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ess_mib::{EssType, SensorModel};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// Shared handle to a weather sensor
pub type SharedSensor = Arc<RwLock<WeatherSensor>>;

/// Capacity of the change notification channel
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Published when a sensor attribute changes value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub sensor: String,
    pub attribute: &'static str,
}

/// Latest committed physical readings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherReadings {
    pub pressure: Option<i32>,
    pub visibility: Option<i32>,
    pub visibility_situation: Option<i32>,
    pub pressure_sensor_height: Option<i32>,
    pub elevation: Option<i32>,
    pub wind_speed: Option<f64>,
    pub wind_dir: Option<i32>,
    pub spot_wind_speed: Option<f64>,
    pub spot_wind_dir: Option<i32>,
    pub gust_speed: Option<f64>,
    pub gust_dir: Option<i32>,
    pub air_temp: Option<i32>,
    pub dew_point_temp: Option<i32>,
    pub max_temp: Option<i32>,
    pub min_temp: Option<i32>,
    pub water_depth: Option<i32>,
    pub adjacent_snow_depth: Option<i32>,
    pub humidity: Option<i32>,
    pub precip_rate: Option<f64>,
    pub precip_situation: Option<i32>,
    pub precip_one_hour: Option<f64>,
    pub precip_3_hour: Option<f64>,
    pub precip_6_hour: Option<f64>,
    pub precip_12_hour: Option<f64>,
    pub precip_24_hour: Option<f64>,
    pub surf_temp: Option<i32>,
    pub pvmt_temp: Option<i32>,
    pub surf_freeze_temp: Option<i32>,
    pub pvmt_surf_status: Option<i32>,
    pub pvmt_friction: Option<i32>,
    pub sub_surf_temp: Option<i32>,
    pub cloud_cover_situation: Option<i32>,
    pub total_sun: Option<i32>,
}

/// One environmental sensor station
#[derive(Debug)]
pub struct WeatherSensor {
    name: String,
    sys_descr: Option<String>,
    software_model: String,
    ess_type: EssType,
    stamp: Option<DateTime<Utc>>,
    settings: Option<String>,
    sample: Option<String>,
    readings: WeatherReadings,
    changes: broadcast::Sender<AttributeChange>,
}

impl WeatherSensor {
    pub fn new(
        name: impl Into<String>,
        sys_descr: Option<String>,
        software_model: Option<String>,
    ) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            name: name.into(),
            sys_descr,
            software_model: software_model.unwrap_or_default(),
            ess_type: EssType::Unknown,
            stamp: None,
            settings: None,
            sample: None,
            readings: WeatherReadings::default(),
            changes,
        }
    }

    pub fn into_shared(self) -> SharedSensor {
        Arc::new(RwLock::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Controller system description, read from the controller setup
    pub fn sys_descr(&self) -> Option<&str> {
        self.sys_descr.as_deref()
    }

    pub fn software_model(&self) -> &str {
        &self.software_model
    }

    pub fn stamp(&self) -> Option<DateTime<Utc>> {
        self.stamp
    }

    pub fn settings(&self) -> Option<&str> {
        self.settings.as_deref()
    }

    pub fn sample(&self) -> Option<&str> {
        self.sample.as_deref()
    }

    pub fn readings(&self) -> &WeatherReadings {
        &self.readings
    }

    /// Subscribe to attribute changes
    pub fn subscribe(&self) -> broadcast::Receiver<AttributeChange> {
        self.changes.subscribe()
    }

    fn notify(&self, attribute: &'static str) {
        trace!("{}: {} changed", self.name, attribute);
        // No subscribers is fine
        let _ = self.changes.send(AttributeChange {
            sensor: self.name.clone(),
            attribute,
        });
    }
}

/// Setter that stores a reading and notifies only on change
macro_rules! reading_setter {
    ($($method:ident => $field:ident: $ty:ty),+ $(,)?) => {
        $(
            fn $method(&mut self, value: Option<$ty>) {
                if self.readings.$field != value {
                    self.readings.$field = value;
                    self.notify(stringify!($field));
                }
            }
        )+
    };
}

impl SensorModel for WeatherSensor {
    fn ess_type(&self) -> EssType {
        self.ess_type
    }

    fn set_ess_type_notify(&mut self, ess_type: EssType) {
        if self.ess_type != ess_type {
            self.ess_type = ess_type;
            self.notify("ess_type");
        }
    }

    fn set_stamp_notify(&mut self, stamp: DateTime<Utc>) {
        if self.stamp != Some(stamp) {
            self.stamp = Some(stamp);
            self.notify("stamp");
        }
    }

    fn set_settings_notify(&mut self, settings: Option<String>) {
        if self.settings != settings {
            self.settings = settings;
            self.notify("settings");
        }
    }

    fn set_sample_notify(&mut self, sample: Option<String>) {
        if self.sample != sample {
            self.sample = sample;
            self.notify("sample");
        }
    }

    reading_setter! {
        set_pressure_notify => pressure: i32,
        set_visibility_notify => visibility: i32,
        set_visibility_situation_notify => visibility_situation: i32,
        set_pressure_sensor_height_notify => pressure_sensor_height: i32,
        set_elevation_notify => elevation: i32,
        set_wind_speed_notify => wind_speed: f64,
        set_wind_dir_notify => wind_dir: i32,
        set_spot_wind_speed_notify => spot_wind_speed: f64,
        set_spot_wind_dir_notify => spot_wind_dir: i32,
        set_gust_speed_notify => gust_speed: f64,
        set_gust_dir_notify => gust_dir: i32,
        set_air_temp_notify => air_temp: i32,
        set_dew_point_temp_notify => dew_point_temp: i32,
        set_max_temp_notify => max_temp: i32,
        set_min_temp_notify => min_temp: i32,
        set_water_depth_notify => water_depth: i32,
        set_adjacent_snow_depth_notify => adjacent_snow_depth: i32,
        set_humidity_notify => humidity: i32,
        set_precip_rate_notify => precip_rate: f64,
        set_precip_situation_notify => precip_situation: i32,
        set_precip_one_hour_notify => precip_one_hour: f64,
        set_precip_3_hour_notify => precip_3_hour: f64,
        set_precip_6_hour_notify => precip_6_hour: f64,
        set_precip_12_hour_notify => precip_12_hour: f64,
        set_precip_24_hour_notify => precip_24_hour: f64,
        set_surf_temp_notify => surf_temp: i32,
        set_pvmt_temp_notify => pvmt_temp: i32,
        set_surf_freeze_temp_notify => surf_freeze_temp: i32,
        set_pvmt_surf_status_notify => pvmt_surf_status: i32,
        set_pvmt_friction_notify => pvmt_friction: i32,
        set_sub_surf_temp_notify => sub_surf_temp: i32,
        set_cloud_cover_situation_notify => cloud_cover_situation: i32,
        set_total_sun_notify => total_sun: i32,
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_notifies_only_on_change() {
        let mut ws = WeatherSensor::new("ess_1", None, None);
        let mut rx = ws.subscribe();

        ws.set_air_temp_notify(Some(4));
        ws.set_air_temp_notify(Some(4));
        ws.set_air_temp_notify(None);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.attribute, "air_temp");
        assert_eq!(first.sensor, "ess_1");
        assert_eq!(rx.try_recv().unwrap().attribute, "air_temp");
        assert!(rx.try_recv().is_err());
        assert_eq!(ws.readings().air_temp, None);
    }

    #[test]
    fn test_ess_type_change() {
        let mut ws = WeatherSensor::new("ess_1", Some("ESS configurable on 1965".into()), None);
        let mut rx = ws.subscribe();
        ws.set_ess_type_notify(EssType::from_sys_descr(ws.sys_descr()));
        assert_eq!(ws.ess_type(), EssType::HighSierra);
        assert_eq!(rx.try_recv().unwrap().attribute, "ess_type");
    }

    #[test]
    fn test_setter_without_subscribers() {
        let mut ws = WeatherSensor::new("ess_1", None, Some("LX-RPU".into()));
        ws.set_wind_speed_notify(Some(3.4));
        assert_eq!(ws.readings().wind_speed, Some(3.4));
        assert_eq!(ws.software_model(), "LX-RPU");
    }
}
