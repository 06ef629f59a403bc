//! Error type for `echelon-feed`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("feed request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("feed returned status {0}")]
  Status(reqwest::StatusCode),

  #[error("malformed feed payload: {0}")]
  Malformed(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
