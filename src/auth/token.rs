//! Token state and token-endpoint payloads.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{LyricError, Result};

/// The bearer token currently held by a [`super::TokenManager`].
///
/// Always replaced as a whole: `access_token` and `expires_at` come from the
/// same token response.
///
/// # Example
/// ```
/// use chrono::{Duration, Utc};
/// use lyric::auth::TokenState;
///
/// let token = TokenState {
///     access_token: "AT1".to_string(),
///     refresh_token: Some("RT1".to_string()),
///     expires_at: Utc::now() + Duration::minutes(30),
/// };
/// assert!(token.is_valid_at(Utc::now(), Duration::seconds(30)));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// True iff `expires_at` lies strictly more than `margin` after `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now < self.expires_at - margin
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &"..")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| ".."))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Lifecycle of the held token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenStatus {
    /// No code has been exchanged yet.
    Uninitialized,
    Valid,
    /// Within the refresh margin of, or past, `expires_at`.
    Expired,
}

/// Body of a successful token-endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: ExpiresIn,
}

/// The vendor sends `expires_in` as a string; standard servers send a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(&self) -> Result<i64> {
        let secs = match self {
            Self::Seconds(secs) => *secs,
            Self::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                malformed(format!("token expires_in is not a number: {text:?}"))
            })?,
        };
        if secs < 0 {
            return Err(malformed(format!("token expires_in is negative: {secs}")));
        }
        Ok(secs)
    }
}

fn malformed(message: String) -> LyricError {
    LyricError::Serialization(<serde_json::Error as serde::de::Error>::custom(message))
}

impl TokenResponse {
    /// Build the next token state.
    ///
    /// `received_at` is read once by the caller when the response arrived.
    /// A refresh response without a refresh token keeps `previous_refresh`.
    pub(crate) fn into_state(
        self,
        received_at: DateTime<Utc>,
        previous_refresh: Option<String>,
    ) -> Result<TokenState> {
        let secs = self.expires_in.seconds()?;
        let expires_at = Duration::try_seconds(secs)
            .and_then(|lifetime| received_at.checked_add_signed(lifetime))
            .ok_or_else(|| malformed(format!("token expires_in is out of range: {secs}")))?;
        Ok(TokenState {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at,
        })
    }
}
