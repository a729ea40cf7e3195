//! Bearer-token lifecycle: code exchange, expiry tracking and lazy refresh.

use std::sync::{Arc, PoisonError, RwLock};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Duration;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use tokio::sync::Mutex;

use super::clock::{Clock, SystemClock};
use super::token::{TokenResponse, TokenState, TokenStatus};
use crate::config::{Credentials, LyricConfig};
use crate::error::{LyricError, Result};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, RequestBody};

/// Holds the single current [`TokenState`] and keeps it usable.
///
/// Reads are cheap snapshots. Every write (code exchange or refresh) runs
/// behind one async gate, so callers that find the token expired at the
/// same time share a single refresh request.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use lyric::auth::TokenManager;
/// use lyric::config::LyricConfig;
/// use lyric::transport::ReqwestTransport;
///
/// # async fn example() -> lyric::error::Result<()> {
/// let config = LyricConfig::new("abc123", "s3cret");
/// let manager = TokenManager::new(&config, Arc::new(ReqwestTransport::default()));
/// manager
///     .exchange_code("abc123", "123456", "http://localhost/callback")
///     .await?;
/// let bearer = manager.get_access_token().await?;
/// # Ok(())
/// # }
/// ```
pub struct TokenManager {
    transport: Arc<dyn HttpTransport>,
    credentials: Credentials,
    token_url: String,
    authorize_url: String,
    margin: Duration,
    clock: Arc<dyn Clock>,
    state: RwLock<Option<TokenState>>,
    gate: Mutex<()>,
}

impl TokenManager {
    pub fn new(config: &LyricConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            credentials: config.credentials(),
            token_url: config.token_url.clone(),
            authorize_url: config.authorize_url.clone(),
            margin: Duration::from_std(config.refresh_margin)
                .unwrap_or_else(|_| Duration::seconds(30)),
            clock: Arc::new(SystemClock),
            state: RwLock::new(None),
            gate: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Start from a token obtained earlier instead of exchanging a code.
    pub fn with_token(self, token: TokenState) -> Self {
        self.store(token);
        self
    }

    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    /// Snapshot of the current token, if any.
    pub fn token(&self) -> Option<TokenState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn status(&self) -> TokenStatus {
        match self.token() {
            None => TokenStatus::Uninitialized,
            Some(token) if token.is_valid_at(self.clock.now(), self.margin) => TokenStatus::Valid,
            Some(_) => TokenStatus::Expired,
        }
    }

    /// Whether a token exists and is not within the refresh margin of expiry.
    pub fn is_valid(&self) -> bool {
        self.status() == TokenStatus::Valid
    }

    /// URL the user opens to grant access; the vendor redirects back to
    /// `redirect_url` with the authorization code.
    pub fn authorize_url(&self, redirect_url: &str, state: Option<&str>) -> Result<String> {
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", self.credentials.client_id()),
            ("redirect_uri", redirect_url),
        ];
        if let Some(state) = state {
            params.push(("state", state));
        }
        let url = Url::parse_with_params(&self.authorize_url, &params).map_err(|e| {
            LyricError::Configuration(format!(
                "invalid authorize URL {}: {e}",
                self.authorize_url
            ))
        })?;
        Ok(url.to_string())
    }

    /// Exchange a one-time authorization code for the first token.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        code: &str,
        redirect_url: &str,
    ) -> Result<TokenState> {
        if client_id != self.credentials.client_id() {
            return Err(LyricError::Configuration(format!(
                "authorization code was issued to client {client_id}, not {}",
                self.credentials.client_id()
            )));
        }

        let _gate = self.gate.lock().await;
        let form = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), redirect_url.to_string()),
        ];
        let token = self.request_token(form, None).await?;
        tracing::debug!(expires_at = %token.expires_at, "Exchanged authorization code");
        self.store(token.clone());
        Ok(token)
    }

    /// Return a usable access token, refreshing first if needed.
    ///
    /// May suspend on a network refresh.
    pub async fn get_access_token(&self) -> Result<String> {
        if let Some(access_token) = self.valid_access_token() {
            return Ok(access_token);
        }

        let _gate = self.gate.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(access_token) = self.valid_access_token() {
            return Ok(access_token);
        }
        let token = self.refresh_locked().await?;
        Ok(token.access_token)
    }

    /// Force a refresh with the held refresh token.
    pub async fn refresh(&self) -> Result<TokenState> {
        let _gate = self.gate.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<TokenState> {
        let refresh_token = match self.token() {
            None => {
                return Err(LyricError::unauthenticated(
                    "no token held; exchange an authorization code first",
                ))
            }
            Some(TokenState {
                refresh_token: None,
                ..
            }) => return Err(LyricError::unauthenticated("no refresh token available")),
            Some(TokenState {
                refresh_token: Some(refresh_token),
                ..
            }) => refresh_token,
        };

        let form = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), refresh_token.clone()),
        ];
        let token = match self.request_token(form, Some(refresh_token)).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(status = ?e.status(), error = %e, "Token refresh failed");
                return Err(e);
            }
        };
        tracing::debug!(expires_at = %token.expires_at, "Refreshed access token");
        self.store(token.clone());
        Ok(token)
    }

    async fn request_token(
        &self,
        form: Vec<(String, String)>,
        previous_refresh: Option<String>,
    ) -> Result<TokenState> {
        let request = HttpRequest::new(HttpMethod::Post, &self.token_url)
            .with_headers(self.token_headers()?)
            .with_body(RequestBody::Form(form));

        let resp = self.transport.send(request).await?;
        let received_at = self.clock.now();
        if resp.status != 200 {
            return Err(LyricError::from_status(resp.status, &resp.body));
        }
        let payload: TokenResponse = serde_json::from_str(&resp.body)?;
        payload.into_state(received_at, previous_refresh)
    }

    fn token_headers(&self) -> Result<HeaderMap> {
        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.client_id(),
            self.credentials.client_secret()
        ));
        let value = HeaderValue::from_str(&format!("Basic {basic}")).map_err(|_| {
            LyricError::Configuration("client credentials are not valid header text".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        Ok(headers)
    }

    fn valid_access_token(&self) -> Option<String> {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let token = guard.as_ref()?;
        token
            .is_valid_at(self.clock.now(), self.margin)
            .then(|| token.access_token.clone())
    }

    fn store(&self, token: TokenState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }
}
