use serde::Deserialize;
use serde_json::Value;

use super::device::DeviceInfo;

/// A water leak detector as returned by `/devices`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterLeakDetector {
    #[serde(flatten)]
    pub info: DeviceInfo,
    pub water_present: Option<bool>,
    pub current_sensor_readings: Option<SensorReadings>,
    #[serde(default)]
    pub current_alarms: Vec<Value>,
    pub last_checkin: Option<String>,
    pub last_device_setting_updated_on: Option<String>,
    pub battery_remaining: Option<f64>,
    pub is_registered: Option<bool>,
    pub has_device_checked_in: Option<bool>,
    pub is_device_offline: Option<bool>,
    pub first_failed_attempt_time: Option<String>,
    pub failed_connection_attempts: Option<i64>,
    pub wifi_signal_strength: Option<i64>,
    pub is_firmware_update_required: Option<bool>,
    pub time: Option<String>,
    pub device_settings: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadings {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl WaterLeakDetector {
    pub fn device_id(&self) -> &str {
        &self.info.device_id
    }

    /// True when the detector reports water, or is offline and cannot say.
    pub fn needs_attention(&self) -> bool {
        self.water_present == Some(true) || self.is_device_offline == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_readings_and_flags() {
        let detector: WaterLeakDetector = serde_json::from_value(json!({
            "deviceID": "WLD-1",
            "deviceType": "Water Leak Detector",
            "waterPresent": false,
            "currentSensorReadings": {"temperature": 21.5, "humidity": 40},
            "batteryRemaining": 87,
            "isDeviceOffline": true,
            "failedConnectionAttempts": 2
        }))
        .unwrap();

        assert_eq!(detector.device_id(), "WLD-1");
        assert_eq!(
            detector.current_sensor_readings.as_ref().and_then(|r| r.temperature),
            Some(21.5)
        );
        assert_eq!(detector.battery_remaining, Some(87.0));
        assert!(detector.current_alarms.is_empty());
        assert!(detector.needs_attention());
    }
}
