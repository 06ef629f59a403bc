//! Error types for the background tasks.

/// Errors surfaced by an ingest cycle.
///
/// The feed and store are generic, so both sides arrive boxed, mirroring
/// how the reconciler reports its two seams.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The leaderboard feed could not be fetched or decoded.
  #[error("feed error: {0}")]
  Feed(#[source] Box<dyn std::error::Error + Send + Sync>),
  /// The snapshot store rejected a read or write.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
