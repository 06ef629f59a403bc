//! Error types for reconciliation.

/// Errors produced while reconciling tier roles.
///
/// The reconciler is generic over its store and gateway, so their
/// error types are boxed at this seam rather than threaded through as
/// type parameters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The guild gateway failed.
  #[error("gateway error: {0}")]
  Gateway(#[source] Box<dyn std::error::Error + Send + Sync>),
  /// The ladder store failed.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
