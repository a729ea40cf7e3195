//! Convenience re-exports for common use.

pub use crate::auth::{TokenManager, TokenState, TokenStatus};
pub use crate::client::Lyric;
pub use crate::config::LyricConfig;
pub use crate::error::{LyricError, Result};
pub use crate::models::{
    Device, Location, Setpoint, Thermostat, ThermostatUpdate, User, WaterLeakDetector,
};
