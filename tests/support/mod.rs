#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use lyric::auth::{Clock, TokenManager, TokenState};
use lyric::client::Lyric;
use lyric::config::LyricConfig;
use lyric::transport::{HttpTransport, ReqwestTransport};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "abc123";
pub const CLIENT_SECRET: &str = "s3cret";
pub const REDIRECT: &str = "http://host/callback";
pub const TOKEN_PATH: &str = "/oauth2/token";

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(secs: i64) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(epoch(secs)),
        })
    }

    pub fn set(&self, secs: i64) {
        *self.now.lock().expect("clock lock poisoned") = epoch(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

pub fn epoch(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn config_for(server: &MockServer) -> LyricConfig {
    LyricConfig::builder()
        .client_id(CLIENT_ID)
        .client_secret(CLIENT_SECRET)
        .base_url(format!("{}/v2", server.uri()))
        .token_url(format!("{}{TOKEN_PATH}", server.uri()))
        .authorize_url(format!("{}/oauth2/authorize", server.uri()))
        .build()
}

pub fn transport(config: &LyricConfig) -> Arc<dyn HttpTransport> {
    Arc::new(ReqwestTransport::new(config.request_timeout))
}

pub fn token_manager(server: &MockServer, clock: Arc<ManualClock>) -> TokenManager {
    let config = config_for(server);
    TokenManager::new(&config, transport(&config)).with_clock(clock)
}

pub fn fresh_token(access_token: &str) -> TokenState {
    TokenState {
        access_token: access_token.to_string(),
        refresh_token: Some("RT-seeded".to_string()),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

/// Client already holding a valid token, so resource calls skip the token endpoint.
pub fn authorized_client(config: LyricConfig) -> Lyric {
    let transport = transport(&config);
    let tokens = TokenManager::new(&config, transport.clone()).with_token(fresh_token("AT-seeded"));
    Lyric::with_token_manager(config, transport, tokens)
}

pub fn with_cache(mut config: LyricConfig, ttl_secs: u64) -> LyricConfig {
    config.cache_ttl = Some(StdDuration::from_secs(ttl_secs));
    config
}

pub fn token_body(access: &str, refresh: Option<&str>, expires_in: Value) -> Value {
    let mut body = json!({"access_token": access, "expires_in": expires_in, "token_type": "Bearer"});
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body
}

pub fn thermostat_json(device_id: &str) -> Value {
    json!({
        "deviceID": device_id,
        "deviceClass": "Thermostat",
        "deviceType": "Thermostat",
        "userDefinedDeviceName": "Hallway",
        "units": "Fahrenheit",
        "indoorTemperature": 69,
        "allowedModes": ["Heat", "Off", "Cool"],
        "minHeatSetpoint": 50,
        "maxHeatSetpoint": 90,
        "minCoolSetpoint": 50,
        "maxCoolSetpoint": 99,
        "changeableValues": {
            "mode": "Heat",
            "heatSetpoint": 68,
            "coolSetpoint": 76,
            "thermostatSetpointStatus": "NoHold",
            "autoChangeoverActive": false
        },
        "settings": {"fan": {"changeableValues": {"mode": "Auto"}}},
        "scheduleType": {"scheduleType": "Timed", "scheduleSubType": "NA"},
        "currentSchedulePeriod": {"day": "Monday", "period": "Home"}
    })
}

pub fn locations_json() -> Value {
    json!([{
        "locationID": 184720,
        "name": "Home",
        "geoFenceEnabled": false,
        "users": [{"userID": 91, "username": "pat@example.com"}],
        "devices": [
            thermostat_json("LCC-1"),
            {"deviceID": "WLD-1", "deviceType": "Water Leak Detector", "waterPresent": false}
        ]
    }])
}
