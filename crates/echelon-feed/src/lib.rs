//! Upstream leaderboard feed for Echelon.
//!
//! Decodes the upstream JSON payload into [`echelon_core::feed::FeedEntry`]
//! rows and provides [`FeedClient`], the HTTP implementation of
//! [`echelon_core::feed::LeaderboardFeed`]. Decoding is all-or-nothing: a
//! payload that does not match the expected shape yields
//! [`Error::Malformed`] and no rows, so a bad cycle writes nothing.

mod client;
mod payload;

pub mod error;

pub use client::FeedClient;
pub use error::{Error, Result};
pub use payload::decode;
