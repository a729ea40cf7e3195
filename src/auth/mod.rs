//! OAuth2 authorization-code flow and bearer-token lifecycle.

pub mod clock;
pub mod manager;
pub mod token;

pub use clock::{Clock, SystemClock};
pub use manager::TokenManager;
pub use token::{TokenState, TokenStatus};
