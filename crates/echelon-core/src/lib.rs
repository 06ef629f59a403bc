//! Core types and trait definitions for the Echelon ladder tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it holds the domain types, the three
//! boundary traits (store, feed, gateway) and the pure query algorithms.

pub mod feed;
pub mod gateway;
pub mod matching;
pub mod overtake;
pub mod resample;
pub mod snapshot;
pub mod store;
pub mod tier;

pub use snapshot::Snapshot;
pub use tier::Tier;
