//! echelond daemon binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite snapshot store, and runs the capture loop, the reconcile loop,
//! and the JSON API.
//!
//! # One-shot capture
//!
//! To run a single capture + retention pass and exit, without touching the
//! chat gateway:
//!
//! ```
//! cargo run -p echelon-daemon --bin echelond -- --fetch-once
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use echelon_api::ApiState;
use echelon_daemon::{DaemonConfig, tasks};
use echelon_discord::RestGateway;
use echelon_feed::FeedClient;
use echelon_roles::Reconciler;
use echelon_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Echelon ladder tracker daemon")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Run a single capture + retention pass and exit.
  #[arg(long)]
  fetch_once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ECHELON"))
    .build()
    .context("failed to read config file")?;

  let cfg: DaemonConfig = settings
    .try_deserialize()
    .context("failed to deserialise DaemonConfig")?;

  // Expand `~` in the database path.
  let db_path = expand_tilde(&cfg.db_path);

  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  let feed = FeedClient::new(cfg.feed_base_url.clone())
    .context("failed to build feed client")?;

  // Helper mode: one capture pass, no gateway, no server.
  if cli.fetch_once {
    let count =
      tasks::capture_once(&feed, &store, &cfg.season, cfg.retention_months)
        .await?;
    tracing::info!("captured {count} rows for season {}", cfg.season);
    return Ok(());
  }

  let gateway = RestGateway::new(cfg.bot_token.clone())
    .context("failed to build gateway")?;

  let store = Arc::new(store);
  let feed = Arc::new(feed);
  let gateway = Arc::new(gateway);
  let reconciler = Arc::new(Reconciler::new(gateway, store.clone()));

  // Background loops.
  tokio::spawn(tasks::run_ingest_loop(
    feed,
    store.clone(),
    cfg.season.clone(),
    cfg.feed_interval_secs,
    cfg.retention_months,
  ));
  tokio::spawn(tasks::run_reconcile_loop(
    reconciler.clone(),
    cfg.season.clone(),
    cfg.reconcile_interval_secs,
  ));

  let state = ApiState { store, reconciler };
  let app = echelon_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
