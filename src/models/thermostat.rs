//! Thermostat record and the commands it accepts.

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::device::DeviceInfo;
use super::location::Location;
use crate::error::{LyricError, Result};

pub const MODE_HEAT: &str = "Heat";
pub const MODE_COOL: &str = "Cool";
pub const STATUS_NO_HOLD: &str = "NoHold";
pub const STATUS_TEMPORARY_HOLD: &str = "TemporaryHold";
pub const STATUS_HOLD_UNTIL: &str = "HoldUntil";

/// Fields of a thermostat the API lets clients write.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeableValues {
    pub mode: Option<String>,
    pub heat_setpoint: Option<f64>,
    pub cool_setpoint: Option<f64>,
    pub thermostat_setpoint_status: Option<String>,
    pub next_period_time: Option<String>,
    pub auto_changeover_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleType {
    pub schedule_type: Option<String>,
    pub schedule_sub_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePeriod {
    pub day: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationHold {
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    pub mode: Option<String>,
    pub fan_request: Option<bool>,
    pub circulation_fan_request: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanChangeableValues {
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanSettings {
    pub allowed_modes: Option<Vec<String>>,
    pub changeable_values: Option<FanChangeableValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatSettings {
    pub fan: Option<FanSettings>,
}

/// A thermostat as returned by `/devices` or `/devices/thermostats`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thermostat {
    #[serde(flatten)]
    pub info: DeviceInfo,
    pub units: Option<String>,
    pub indoor_temperature: Option<f64>,
    pub outdoor_temperature: Option<f64>,
    #[serde(default)]
    pub allowed_modes: Vec<String>,
    pub deadband: Option<f64>,
    pub has_dual_setpoint_status: Option<bool>,
    pub min_heat_setpoint: Option<f64>,
    pub max_heat_setpoint: Option<f64>,
    pub min_cool_setpoint: Option<f64>,
    pub max_cool_setpoint: Option<f64>,
    #[serde(default)]
    pub changeable_values: ChangeableValues,
    pub operation_status: Option<OperationStatus>,
    pub smart_away: Option<Value>,
    pub indoor_humidity: Option<f64>,
    pub indoor_humidity_status: Option<String>,
    pub is_alive: Option<bool>,
    pub is_upgrading: Option<bool>,
    pub is_provisioned: Option<bool>,
    pub settings: Option<ThermostatSettings>,
    #[serde(rename = "macID")]
    pub mac_id: Option<String>,
    pub schedule_status: Option<String>,
    pub allowed_time_increments: Option<i64>,
    pub thermostat_version: Option<String>,
    pub is_registered: Option<bool>,
    pub devicesettings: Option<Value>,
    pub displayed_outdoor_humidity: Option<f64>,
    pub current_schedule_period: Option<SchedulePeriod>,
    pub schedule_capabilities: Option<Value>,
    #[serde(rename = "scheduleType")]
    pub schedule_type_info: Option<ScheduleType>,
    pub schedule: Option<ScheduleType>,
    pub vacation_hold: Option<VacationHold>,
}

/// Requested thermostat setpoint change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setpoint {
    /// Applied to the setpoint matching the current mode (Heat or Cool).
    Single(f64),
    Range { cool: f64, heat: f64 },
}

/// A partial thermostat change. Unset fields keep the thermostat's current value.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct ThermostatUpdate {
    #[builder(into)]
    pub mode: Option<String>,
    pub heat_setpoint: Option<f64>,
    pub cool_setpoint: Option<f64>,
    #[builder(into)]
    pub thermostat_setpoint_status: Option<String>,
    pub auto_changeover_active: Option<bool>,
    #[builder(into)]
    pub next_period_time: Option<String>,
}

impl ThermostatUpdate {
    /// Hold the given setpoints until `next_period_time` (`HH:MM:SS`).
    pub fn hold_until(
        next_period_time: impl Into<String>,
        heat_setpoint: Option<f64>,
        cool_setpoint: Option<f64>,
    ) -> Result<Self> {
        let next_period_time = next_period_time.into();
        if next_period_time.trim().is_empty() {
            return Err(LyricError::InvalidArgument(
                "next_period_time is required for HoldUntil".to_string(),
            ));
        }
        Ok(Self {
            heat_setpoint,
            cool_setpoint,
            thermostat_setpoint_status: Some(STATUS_HOLD_UNTIL.to_string()),
            next_period_time: Some(next_period_time),
            ..Self::default()
        })
    }
}

/// Body of `POST /devices/thermostats/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatChange {
    pub mode: String,
    pub heat_setpoint: f64,
    pub cool_setpoint: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermostat_setpoint_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_changeover_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_period_time: Option<String>,
}

/// Body of `POST /devices/thermostats/{id}/fan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanChange {
    pub mode: String,
}

impl Thermostat {
    pub fn device_id(&self) -> &str {
        &self.info.device_id
    }

    pub fn operation_mode(&self) -> Option<&str> {
        self.changeable_values.mode.as_deref()
    }

    pub fn heat_setpoint(&self) -> Option<f64> {
        self.changeable_values.heat_setpoint
    }

    pub fn cool_setpoint(&self) -> Option<f64> {
        self.changeable_values.cool_setpoint
    }

    pub fn setpoint_status(&self) -> Option<&str> {
        self.changeable_values.thermostat_setpoint_status.as_deref()
    }

    pub fn can_heat(&self) -> bool {
        self.allowed_modes.iter().any(|m| m == MODE_HEAT)
    }

    pub fn can_cool(&self) -> bool {
        self.allowed_modes.iter().any(|m| m == MODE_COOL)
    }

    pub fn has_fan(&self) -> bool {
        self.settings.as_ref().is_some_and(|s| s.fan.is_some())
    }

    /// Heat setpoint in Heat mode, cool setpoint otherwise.
    pub fn temperature_setpoint(&self) -> Option<f64> {
        if self.operation_mode() == Some(MODE_HEAT) {
            self.heat_setpoint()
        } else {
            self.cool_setpoint()
        }
    }

    pub fn max_setpoint(&self) -> Option<f64> {
        if self.can_heat() {
            self.max_heat_setpoint
        } else {
            self.max_cool_setpoint
        }
    }

    pub fn min_setpoint(&self) -> Option<f64> {
        if self.can_cool() {
            self.min_cool_setpoint
        } else {
            self.min_heat_setpoint
        }
    }

    pub fn fan_mode(&self) -> Option<&str> {
        self.settings
            .as_ref()?
            .fan
            .as_ref()?
            .changeable_values
            .as_ref()?
            .mode
            .as_deref()
    }

    pub fn vacation_hold(&self) -> Option<bool> {
        self.vacation_hold.as_ref()?.enabled
    }

    pub fn schedule_type(&self) -> Option<&str> {
        self.schedule_type_info
            .as_ref()
            .and_then(|s| s.schedule_type.as_deref())
            .or_else(|| self.schedule.as_ref()?.schedule_type.as_deref())
    }

    pub fn schedule_sub_type(&self) -> Option<&str> {
        self.schedule_type_info.as_ref()?.schedule_sub_type.as_deref()
    }

    /// Whether the schedule currently considers the home unoccupied.
    ///
    /// `None` when the schedule type gives no answer.
    pub fn is_away(&self, location: &Location) -> Option<bool> {
        let period = || {
            self.current_schedule_period
                .as_ref()
                .and_then(|p| p.period.as_deref())
        };
        match (self.schedule_type(), self.schedule_sub_type()) {
            (Some("Geofence"), _) => {
                if location.geo_fence_enabled == Some(true) {
                    location.within_fence().map(|inside| inside == 0)
                } else {
                    None
                }
            }
            (Some("Timed"), Some("NA")) => Some(period() == Some("Away")),
            (Some("Timed"), Some("EMEA")) => Some(period() == Some("P3")),
            _ => None,
        }
    }

    /// Resolve a partial update against the current values.
    ///
    /// Setpoint status and auto-changeover are only sent when the thermostat
    /// exposes them.
    pub fn change_for(&self, update: ThermostatUpdate) -> Result<ThermostatChange> {
        let current = &self.changeable_values;
        let mode = update
            .mode
            .or_else(|| current.mode.clone())
            .ok_or_else(|| missing_field("mode"))?;
        let heat_setpoint = update
            .heat_setpoint
            .or(current.heat_setpoint)
            .ok_or_else(|| missing_field("heatSetpoint"))?;
        let cool_setpoint = update
            .cool_setpoint
            .or(current.cool_setpoint)
            .ok_or_else(|| missing_field("coolSetpoint"))?;

        let thermostat_setpoint_status = current
            .thermostat_setpoint_status
            .as_ref()
            .map(|status| update.thermostat_setpoint_status.unwrap_or_else(|| status.clone()));
        let auto_changeover_active = current
            .auto_changeover_active
            .map(|active| update.auto_changeover_active.unwrap_or(active));

        Ok(ThermostatChange {
            mode,
            heat_setpoint,
            cool_setpoint,
            thermostat_setpoint_status,
            auto_changeover_active,
            next_period_time: update.next_period_time,
        })
    }

    /// Build the update for a new temperature setpoint.
    ///
    /// A schedule-following or hold-until status becomes a temporary hold.
    pub fn setpoint_update(&self, setpoint: Setpoint) -> Result<ThermostatUpdate> {
        let status = match self.setpoint_status() {
            Some(STATUS_NO_HOLD) | Some(STATUS_HOLD_UNTIL) => {
                Some(STATUS_TEMPORARY_HOLD.to_string())
            }
            other => other.map(str::to_string),
        };
        let update = ThermostatUpdate {
            thermostat_setpoint_status: status,
            ..ThermostatUpdate::default()
        };
        match (setpoint, self.operation_mode()) {
            (Setpoint::Range { cool, heat }, _) => Ok(ThermostatUpdate {
                cool_setpoint: Some(cool),
                heat_setpoint: Some(heat),
                ..update
            }),
            (Setpoint::Single(value), Some(MODE_COOL)) => Ok(ThermostatUpdate {
                cool_setpoint: Some(value),
                ..update
            }),
            (Setpoint::Single(value), Some(MODE_HEAT)) => Ok(ThermostatUpdate {
                heat_setpoint: Some(value),
                ..update
            }),
            (Setpoint::Single(_), mode) => Err(LyricError::InvalidArgument(format!(
                "a single setpoint needs Heat or Cool mode, thermostat is in {}",
                mode.unwrap_or("no mode")
            ))),
        }
    }

    /// Resolve a fan change; `None` re-sends the current fan mode.
    pub fn fan_change(&self, mode: Option<&str>) -> Result<FanChange> {
        let mode = mode
            .or_else(|| self.fan_mode())
            .ok_or_else(|| missing_field("fan mode"))?;
        Ok(FanChange {
            mode: mode.to_string(),
        })
    }
}

fn missing_field(field: &str) -> LyricError {
    LyricError::InvalidArgument(format!(
        "{field} not given and the thermostat reports no current value"
    ))
}
