//! Daemon wiring for Echelon: configuration, the capture pipeline, and the
//! background loops driven by the `echelond` binary.

pub mod error;
pub mod ingest;
pub mod tasks;

pub use error::Error;

use std::path::PathBuf;

use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime daemon configuration, deserialised from `config.toml` and the
/// `ECHELON_*` environment.
#[derive(Deserialize, Clone)]
pub struct DaemonConfig {
  pub season:                  String,
  pub db_path:                 PathBuf,
  pub host:                    String,
  pub port:                    u16,
  pub feed_base_url:           String,
  pub bot_token:               String,
  #[serde(default = "default_feed_interval_secs")]
  pub feed_interval_secs:      u64,
  #[serde(default = "default_reconcile_interval_secs")]
  pub reconcile_interval_secs: u64,
  /// History horizon for the retention sweep, in 30-day months.
  #[serde(default = "default_retention_months")]
  pub retention_months:        u32,
}

fn default_feed_interval_secs() -> u64 {
  600
}

fn default_reconcile_interval_secs() -> u64 {
  3600
}

fn default_retention_months() -> u32 {
  3
}
