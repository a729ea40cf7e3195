//! High-level client for the Lyric REST API.

pub mod pipeline;

pub use pipeline::{ApiRequest, RequestPipeline};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{Clock, TokenManager, TokenState};
use crate::config::LyricConfig;
use crate::error::Result;
use crate::models::{Device, Location, Setpoint, Thermostat, ThermostatUpdate};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::util::cache::ResponseCache;

const CACHE_CAPACITY: usize = 16;

/// Async client for one Lyric developer account.
///
/// Cheap to clone; clones share the token and the location cache.
///
/// # Example
/// ```no_run
/// use lyric::client::Lyric;
/// use lyric::config::LyricConfig;
///
/// # async fn example() -> lyric::error::Result<()> {
/// let lyric = Lyric::new(LyricConfig::from_env()?);
/// let (url, _state) = lyric.authorize_url("http://localhost:8080/callback")?;
/// println!("open {url}");
/// // ...the vendor redirects back with ?code=...
/// lyric.exchange_code("123456", "http://localhost:8080/callback").await?;
///
/// for location in lyric.get_locations().await? {
///     for thermostat in location.thermostats() {
///         println!("{:?}: {:?}", thermostat.info.display_name(), thermostat.indoor_temperature);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Lyric {
    inner: Arc<Inner>,
}

struct Inner {
    config: LyricConfig,
    transport: Arc<dyn HttpTransport>,
    pipeline: RequestPipeline,
    cache: Option<ResponseCache>,
}

impl Lyric {
    pub fn new(config: LyricConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout));
        Self::with_transport(config, transport)
    }

    /// Use a custom transport for every request, token calls included.
    pub fn with_transport(config: LyricConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let tokens = TokenManager::new(&config, transport.clone());
        Self::with_token_manager(config, transport, tokens)
    }

    pub fn with_token_manager(
        config: LyricConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: TokenManager,
    ) -> Self {
        let cache = config
            .cache_ttl
            .map(|ttl| ResponseCache::new(CACHE_CAPACITY, ttl));
        let pipeline = RequestPipeline::new(Arc::new(tokens), transport.clone());
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                pipeline,
                cache,
            }),
        }
    }

    /// Replace the clock used for token expiry. Any token already held is kept.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        let config = self.inner.config.clone();
        let transport = self.inner.transport.clone();
        let mut tokens = TokenManager::new(&config, transport.clone()).with_clock(clock);
        if let Some(token) = self.token_manager().token() {
            tokens = tokens.with_token(token);
        }
        Self::with_token_manager(config, transport, tokens)
    }

    pub fn config(&self) -> &LyricConfig {
        &self.inner.config
    }

    pub fn token_manager(&self) -> &TokenManager {
        self.inner.pipeline.token_manager()
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.inner.pipeline
    }

    /// Authorization URL plus the random `state` value embedded in it.
    ///
    /// Compare the returned state with the one on the redirect.
    pub fn authorize_url(&self, redirect_url: &str) -> Result<(String, String)> {
        let state = Uuid::new_v4().to_string();
        let url = self
            .token_manager()
            .authorize_url(redirect_url, Some(state.as_str()))?;
        Ok((url, state))
    }

    pub async fn exchange_code(&self, code: &str, redirect_url: &str) -> Result<TokenState> {
        self.token_manager()
            .exchange_code(&self.inner.config.client_id, code, redirect_url)
            .await
    }

    /// All locations with their users and devices.
    pub async fn get_locations(&self) -> Result<Vec<Location>> {
        let url = self.inner.config.endpoint("locations");
        if let Some(cached) = self.inner.cache.as_ref().and_then(|c| c.get(&url)) {
            tracing::trace!(%url, "Location cache hit");
            return parse(cached);
        }

        let generation = self.inner.cache.as_ref().map(ResponseCache::generation);
        let value = self.inner.pipeline.send(ApiRequest::get(&url)).await?;
        if let (Some(cache), Some(generation)) = (&self.inner.cache, generation) {
            if !cache.insert_if_current(generation, url.clone(), value.clone()) {
                tracing::trace!(%url, "Location response predates a write, not cached");
            }
        }
        parse(value)
    }

    pub async fn get_location(&self, location_id: &str) -> Result<Option<Location>> {
        Ok(self
            .get_locations()
            .await?
            .into_iter()
            .find(|l| l.location_id == location_id))
    }

    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        let url = self.inner.config.endpoint("devices");
        parse(self.inner.pipeline.send(ApiRequest::get(url)).await?)
    }

    /// Devices of one kind at a location; `device_type` is the path segment
    /// such as `thermostats` or `waterLeakDetectors`.
    pub async fn get_devices_of_type(
        &self,
        device_type: &str,
        location_id: &str,
    ) -> Result<Vec<Device>> {
        let url = self.inner.config.endpoint(&format!("devices/{device_type}"));
        let request = ApiRequest::get(url).query("locationId", location_id);
        parse(self.inner.pipeline.send(request).await?)
    }

    pub async fn get_thermostat(&self, location_id: &str, device_id: &str) -> Result<Thermostat> {
        let url = self.thermostat_url(device_id);
        let request = ApiRequest::get(url).query("locationId", location_id);
        parse(self.inner.pipeline.send(request).await?)
    }

    /// Apply a partial change; unset fields keep the thermostat's current values.
    pub async fn update_thermostat(
        &self,
        location_id: &str,
        thermostat: &Thermostat,
        update: ThermostatUpdate,
    ) -> Result<()> {
        let change = thermostat.change_for(update)?;
        let url = self.thermostat_url(thermostat.device_id());
        self.post(url, location_id, serde_json::to_value(change)?)
            .await
    }

    pub async fn set_temperature_setpoint(
        &self,
        location_id: &str,
        thermostat: &Thermostat,
        setpoint: Setpoint,
    ) -> Result<()> {
        let update = thermostat.setpoint_update(setpoint)?;
        self.update_thermostat(location_id, thermostat, update)
            .await
    }

    /// Set the fan mode, or re-send the current one when `mode` is `None`.
    pub async fn update_fan(
        &self,
        location_id: &str,
        thermostat: &Thermostat,
        mode: Option<&str>,
    ) -> Result<()> {
        let change = thermostat.fan_change(mode)?;
        let url = format!("{}/fan", self.thermostat_url(thermostat.device_id()));
        self.post(url, location_id, serde_json::to_value(change)?)
            .await
    }

    async fn post(&self, url: String, location_id: &str, body: Value) -> Result<()> {
        let request = ApiRequest::post(url, body).query("locationId", location_id);
        self.inner.pipeline.send(request).await?;
        if let Some(cache) = &self.inner.cache {
            cache.clear();
        }
        Ok(())
    }

    fn thermostat_url(&self, device_id: &str) -> String {
        self.inner
            .config
            .endpoint(&format!("devices/thermostats/{device_id}"))
    }
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}
