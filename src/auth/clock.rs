//! Time source for token expiry.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Token expiry is computed and checked against this clock so that expiry
/// behaviour can be driven deterministically.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
