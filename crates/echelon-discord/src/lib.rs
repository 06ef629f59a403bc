//! Discord REST implementation of the Echelon guild gateway.
//!
//! Talks to the Discord HTTP API (v10) with a bot token. Stateless: every
//! call hits the API directly, with no member or role caches, so callers
//! always see current remote state.

mod gateway;

pub mod error;

pub use error::{Error, Result};
pub use gateway::RestGateway;
