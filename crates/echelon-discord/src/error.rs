//! Error type for `echelon-discord`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("gateway request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{endpoint} returned status {status}")]
  Status {
    endpoint: String,
    status:   reqwest::StatusCode,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
