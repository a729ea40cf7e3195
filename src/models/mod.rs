//! Typed records for the resources the API returns.
//!
//! Each response is deserialized once; unknown fields are ignored.

pub mod device;
pub mod location;
pub mod thermostat;
pub mod user;
pub mod water_leak_detector;

pub use device::{Device, DeviceInfo, THERMOSTAT_TYPE, WATER_LEAK_DETECTOR_TYPE};
pub use location::{GeoFence, GeoOccupancy, Location};
pub use thermostat::{
    ChangeableValues, FanChange, Setpoint, Thermostat, ThermostatChange, ThermostatUpdate,
};
pub use user::User;
pub use water_leak_detector::WaterLeakDetector;

use serde::{Deserialize, Deserializer};

/// The API sends numeric ids for locations and users; keep them as text.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}
