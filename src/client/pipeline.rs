//! Authenticated request pipeline.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use crate::auth::TokenManager;
use crate::error::{LyricError, Result};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, RequestBody};

/// One resource request before authentication is attached.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(HttpMethod::Post, url)
        }
    }

    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Sends resource requests with a valid bearer token and the `apikey`
/// query parameter, and classifies every response the same way.
///
/// Each call makes one attempt. A 401/403 surfaces as
/// [`LyricError::Authentication`] so the caller can re-authorize.
#[derive(Clone)]
pub struct RequestPipeline {
    tokens: Arc<TokenManager>,
    transport: Arc<dyn HttpTransport>,
}

impl RequestPipeline {
    pub fn new(tokens: Arc<TokenManager>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { tokens, transport }
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Send `method url` with optional extra headers and JSON body.
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Option<HeaderMap>,
        body: Option<Value>,
    ) -> Result<Value> {
        let mut request = ApiRequest::new(method, url);
        request.headers = headers.unwrap_or_default();
        request.body = body;
        self.send(request).await
    }

    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        let access_token = self.tokens.get_access_token().await?;

        let mut headers = request.headers;
        headers.insert(AUTHORIZATION, bearer(&access_token)?);

        let outbound = request
            .query
            .into_iter()
            .filter(|(key, _)| key != "apikey")
            .fold(
                HttpRequest::new(request.method, request.url),
                |outbound, (key, value)| outbound.with_query(key, value),
            )
            .with_query("apikey", self.tokens.client_id())
            .with_headers(headers)
            .with_body(request.body.map(RequestBody::Json).unwrap_or_default());
        let method = outbound.method;
        let url = outbound.url.clone();

        let resp = self.transport.send(outbound).await?;
        tracing::debug!(%method, %url, status = resp.status, "Lyric API response");

        if resp.status != 200 {
            return Err(LyricError::from_status(resp.status, &resp.body));
        }
        resp.json()
    }
}

fn bearer(access_token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|_| {
        LyricError::unauthenticated("access token is not valid header text")
    })?;
    value.set_sensitive(true);
    Ok(value)
}
