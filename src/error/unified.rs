//! Error classification and recovery hints.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Credentials rejected or missing.
    Authentication,
    /// Non-success status outside 401/403 and 5xx.
    Api,
    /// 5xx from the vendor.
    Server,
    /// No usable HTTP response: timeout, connection failure, malformed body.
    Transport,
    Configuration,
    InvalidArgument,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    /// Run the authorization-code flow again.
    Reauthorize,
    CheckConfiguration,
    IncreaseTimeout,
    FixRequest,
    ContactSupport,
}
