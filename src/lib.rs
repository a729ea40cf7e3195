//! Lyric: async Rust client for the Honeywell Lyric (Resideo) REST API.
//!
//! Handles the OAuth2 authorization-code flow, keeps the bearer token fresh,
//! and exposes locations, thermostats and water leak detectors as typed
//! records.
//!
//! # Quick Start
//!
//! ```no_run
//! use lyric::prelude::*;
//!
//! # async fn example() -> lyric::error::Result<()> {
//! let lyric = Lyric::new(LyricConfig::from_env()?);
//! lyric.exchange_code("123456", "http://localhost:8080/callback").await?;
//!
//! let locations = lyric.get_locations().await?;
//! let location = &locations[0];
//! if let Some(thermostat) = location.thermostats().next() {
//!     lyric
//!         .set_temperature_setpoint(&location.location_id, thermostat, Setpoint::Single(70.0))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod transport;
pub mod util;
