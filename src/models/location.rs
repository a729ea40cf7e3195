use serde::Deserialize;

use super::device::Device;
use super::id_string;
use super::thermostat::Thermostat;
use super::user::User;
use super::water_leak_detector::WaterLeakDetector;

/// A home registered with the account, with its users and devices inline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "locationID", deserialize_with = "id_string")]
    pub location_id: String,
    pub name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zipcode: Option<String>,
    pub time_zone: Option<String>,
    pub daylight_saving_time_enabled: Option<bool>,
    pub geo_fence_enabled: Option<bool>,
    #[serde(default)]
    pub geo_fences: Vec<GeoFence>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoFence {
    pub geo_occupancy: Option<GeoOccupancy>,
}

/// Number of users inside and outside the fence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoOccupancy {
    pub within_fence: Option<i64>,
    pub outside_fence: Option<i64>,
}

impl Location {
    pub fn thermostats(&self) -> impl Iterator<Item = &Thermostat> {
        self.devices.iter().filter_map(Device::as_thermostat)
    }

    pub fn water_leak_detectors(&self) -> impl Iterator<Item = &WaterLeakDetector> {
        self.devices.iter().filter_map(Device::as_water_leak_detector)
    }

    pub fn device(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.device_id() == device_id)
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    pub fn geo_fence(&self, index: usize) -> Option<&GeoFence> {
        self.geo_fences.get(index)
    }

    fn occupancy(&self) -> Option<&GeoOccupancy> {
        self.geo_fence(0)?.geo_occupancy.as_ref()
    }

    /// Users inside the first geofence.
    pub fn within_fence(&self) -> Option<i64> {
        self.occupancy()?.within_fence
    }

    pub fn outside_fence(&self) -> Option<i64> {
        self.occupancy()?.outside_fence
    }
}
