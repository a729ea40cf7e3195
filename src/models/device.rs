//! Device records and the `deviceType` dispatch.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::thermostat::Thermostat;
use super::water_leak_detector::WaterLeakDetector;

pub const THERMOSTAT_TYPE: &str = "Thermostat";
pub const WATER_LEAK_DETECTOR_TYPE: &str = "Water Leak Detector";

/// Fields every device carries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    pub device_class: Option<String>,
    pub device_type: Option<String>,
    pub name: Option<String>,
    pub user_defined_device_name: Option<String>,
}

impl DeviceInfo {
    /// `name` when the API provides one, else the user-defined name.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.user_defined_device_name.as_deref())
    }
}

/// A device, typed by its `deviceType`.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Thermostat(Box<Thermostat>),
    WaterLeakDetector(Box<WaterLeakDetector>),
    Other(DeviceInfo),
}

impl Device {
    pub fn info(&self) -> &DeviceInfo {
        match self {
            Self::Thermostat(t) => &t.info,
            Self::WaterLeakDetector(w) => &w.info,
            Self::Other(info) => info,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.info().device_id
    }

    pub fn as_thermostat(&self) -> Option<&Thermostat> {
        match self {
            Self::Thermostat(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_water_leak_detector(&self) -> Option<&WaterLeakDetector> {
        match self {
            Self::WaterLeakDetector(w) => Some(w),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Device {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let device_type = value
            .get("deviceType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let device = match device_type.as_str() {
            THERMOSTAT_TYPE => Self::Thermostat(Box::new(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            )),
            WATER_LEAK_DETECTOR_TYPE => Self::WaterLeakDetector(Box::new(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            )),
            _ => Self::Other(serde_json::from_value(value).map_err(D::Error::custom)?),
        };
        Ok(device)
    }
}
