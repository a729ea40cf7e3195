//! Client configuration (explicit builder > env > defaults).

use std::fmt;
use std::time::Duration;

use bon::Builder;

use crate::error::{LyricError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.honeywell.com/v2";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://api.honeywell.com/oauth2/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://api.honeywell.com/oauth2/token";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(30);

/// OAuth client credentials issued by the vendor developer portal.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"..")
            .finish()
    }
}

/// Configuration for a [`crate::client::Lyric`] client.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use lyric::config::LyricConfig;
///
/// let config = LyricConfig::builder()
///     .client_id("abc123")
///     .client_secret("s3cret")
///     .cache_ttl(Duration::from_secs(60))
///     .build();
/// assert_eq!(config.request_timeout, Duration::from_secs(20));
/// ```
#[derive(Clone, Builder)]
pub struct LyricConfig {
    #[builder(into)]
    pub client_id: String,
    #[builder(into)]
    pub client_secret: String,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(into, default = DEFAULT_TOKEN_URL.to_string())]
    pub token_url: String,
    #[builder(into, default = DEFAULT_AUTHORIZE_URL.to_string())]
    pub authorize_url: String,
    /// Upper bound for each HTTP attempt.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    /// A token expiring within this window is treated as expired.
    #[builder(default = DEFAULT_REFRESH_MARGIN)]
    pub refresh_margin: Duration,
    /// Enables the location cache when set.
    pub cache_ttl: Option<Duration>,
}

impl fmt::Debug for LyricConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LyricConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"..")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("authorize_url", &self.authorize_url)
            .field("request_timeout", &self.request_timeout)
            .field("refresh_margin", &self.refresh_margin)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl LyricConfig {
    /// Minimal config with default endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::builder()
            .client_id(client_id)
            .client_secret(client_secret)
            .build()
    }

    /// Load from environment variables (`LYRIC_CLIENT_ID`, `LYRIC_CLIENT_SECRET`, ...).
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let client_id = required_var("LYRIC_CLIENT_ID")?;
        let client_secret = required_var("LYRIC_CLIENT_SECRET")?;
        let mut config = Self::new(client_id, client_secret);

        if let Ok(url) = std::env::var("LYRIC_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(url) = std::env::var("LYRIC_TOKEN_URL") {
            config.token_url = url;
        }
        if let Ok(url) = std::env::var("LYRIC_AUTHORIZE_URL") {
            config.authorize_url = url;
        }
        if let Some(secs) = seconds_var("LYRIC_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = seconds_var("LYRIC_CACHE_TTL_SECS")? {
            config.cache_ttl = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.client_id, &self.client_secret)
    }

    /// Join a resource path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn required_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(LyricError::Configuration(format!(
            "Environment variable {name} not set"
        ))),
    }
}

fn seconds_var(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
            LyricError::Configuration(format!("{name} must be a whole number of seconds, got {raw:?}"))
        }),
        Err(_) => Ok(None),
    }
}
