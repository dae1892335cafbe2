//! One polling cycle's worth of decoded values

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::groups::{AtmosphericValues, InstrumentValues, PrecipitationValues, RadiationValues};
use crate::sensors::{
    PavementSensorsTable, SubSurfaceSensorsTable, TemperatureSensorsTable, WindSensorsTable,
};
use crate::{EssType, Result, SensorModel};

/// High Sierra controllers report surface readings on these pavement rows
const HIGH_SIERRA_SURFACE_ROWS: [u32; 2] = [3, 4];

/// Every value group for a single poll
///
/// Created when an operation starts and dropped after its one commit.
#[derive(Debug, Clone, Default)]
pub struct EssRec {
    pub instrument: InstrumentValues,
    pub atmospheric: AtmosphericValues,
    pub wind: WindSensorsTable,
    pub temperature: TemperatureSensorsTable,
    pub precipitation: PrecipitationValues,
    pub pavement: PavementSensorsTable,
    pub sub_surface: SubSurfaceSensorsTable,
    pub radiation: RadiationValues,
}

impl EssRec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit all decoded values, stamped now
    pub fn store(&self, model: &mut dyn SensorModel) {
        self.store_at(Utc::now(), model);
    }

    /// Commit all decoded values; undecoded values clear the model's copy
    pub fn store_at(&self, stamp: DateTime<Utc>, model: &mut dyn SensorModel) {
        model.set_stamp_notify(stamp);
        self.store_atmospheric(model);
        self.store_wind(model);
        self.store_temperature(model);
        self.store_precipitation(model);
        self.store_pavement(model);
        self.store_sub_surface(model);
        self.store_radiation(model);
    }

    fn store_atmospheric(&self, model: &mut dyn SensorModel) {
        let a = &self.atmospheric;
        model.set_pressure_notify(a.atmospheric_pressure.integer());
        model.set_visibility_notify(a.visibility.integer());
        model.set_visibility_situation_notify(a.visibility_situation.valid_ordinal());
        model.set_pressure_sensor_height_notify(a.pressure_sensor_height.integer());
        model.set_elevation_notify(a.reference_elevation.integer());
    }

    fn store_wind(&self, model: &mut dyn SensorModel) {
        let w = &self.wind;
        model.set_wind_speed_notify(w.avg_speed().rounded());
        model.set_wind_dir_notify(w.avg_direction().integer());
        model.set_spot_wind_speed_notify(w.spot_speed().rounded());
        model.set_spot_wind_dir_notify(w.spot_direction().integer());
        model.set_gust_speed_notify(w.gust_speed().rounded());
        model.set_gust_dir_notify(w.gust_direction().integer());
    }

    fn store_temperature(&self, model: &mut dyn SensorModel) {
        let t = &self.temperature;
        model.set_air_temp_notify(t.air_temp().and_then(|a| a.integer()));
        model.set_dew_point_temp_notify(t.dew_point_temp.integer());
        model.set_max_temp_notify(t.max_air_temp.integer());
        model.set_min_temp_notify(t.min_air_temp.integer());
    }

    fn store_precipitation(&self, model: &mut dyn SensorModel) {
        let p = &self.precipitation;
        model.set_water_depth_notify(p.water_depth.integer());
        model.set_adjacent_snow_depth_notify(p.snow_depth.integer());
        model.set_humidity_notify(p.relative_humidity.integer());
        model.set_precip_rate_notify(p.precip_rate.rounded());
        model.set_precip_situation_notify(p.precip_situation.valid_ordinal());
        model.set_precip_one_hour_notify(p.precip_1_hour.rounded());
        model.set_precip_3_hour_notify(p.precip_3_hours.rounded());
        model.set_precip_6_hour_notify(p.precip_6_hours.rounded());
        model.set_precip_12_hour_notify(p.precip_12_hours.rounded());
        model.set_precip_24_hour_notify(p.precip_24_hours.rounded());
    }

    fn store_pavement(&self, model: &mut dyn SensorModel) {
        match model.ess_type() {
            EssType::HighSierra => {
                let row = self.pavement.first_active_of(&HIGH_SIERRA_SURFACE_ROWS);
                model.set_surf_temp_notify(row.and_then(|r| r.surface_temp.integer()));
                model.set_pvmt_surf_status_notify(
                    row.and_then(|r| r.surface_status.valid_ordinal()),
                );
                model.set_pvmt_temp_notify(None);
                model.set_surf_freeze_temp_notify(None);
                model.set_pvmt_friction_notify(None);
            },
            EssType::Generic | EssType::Unknown => {
                let row = self.pavement.first_active();
                model.set_surf_temp_notify(row.and_then(|r| r.surface_temp.integer()));
                model.set_pvmt_temp_notify(row.and_then(|r| r.pavement_temp.integer()));
                model.set_surf_freeze_temp_notify(row.and_then(|r| r.freeze_point.integer()));
                model.set_pvmt_surf_status_notify(
                    row.and_then(|r| r.surface_status.valid_ordinal()),
                );
                model.set_pvmt_friction_notify(row.and_then(|r| r.friction.integer()));
            },
        }
    }

    fn store_sub_surface(&self, model: &mut dyn SensorModel) {
        let temp = match model.ess_type() {
            EssType::HighSierra => None,
            _ => self.sub_surface.first_valid_temp().and_then(|t| t.integer()),
        };
        model.set_sub_surf_temp_notify(temp);
    }

    fn store_radiation(&self, model: &mut dyn SensorModel) {
        let r = &self.radiation;
        model.set_cloud_cover_situation_notify(r.cloud_situation.valid_ordinal());
        model.set_total_sun_notify(r.total_sun.integer());
    }

    /// Diagnostic document; null values are omitted
    pub fn to_json_value(&self) -> Result<Value> {
        let mut map = Map::new();
        self.instrument.to_json(&mut map)?;
        self.atmospheric.to_json(&mut map)?;
        self.wind.to_json(&mut map)?;
        self.temperature.to_json(&mut map)?;
        self.precipitation.to_json(&mut map)?;
        self.pavement.to_json(&mut map)?;
        self.sub_surface.to_json(&mut map)?;
        self.radiation.to_json(&mut map)?;
        Ok(Value::Object(map))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_value()?)?)
    }
}
