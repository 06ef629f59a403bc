//! Long-running background loops.
//!
//! Both loops tick on a fixed cadence with
//! [`MissedTickBehavior::Skip`]: a pass that overruns its interval defers
//! to the next tick instead of firing a burst of catch-up passes. The
//! first tick fires immediately, so the daemon captures and reconciles
//! right after startup.

use std::{sync::Arc, time::Duration};

use echelon_core::{
  feed::LeaderboardFeed, gateway::GuildGateway, store::LadderStore,
};
use echelon_roles::Reconciler;
use tokio::time::MissedTickBehavior;

use crate::{
  error::{Error, Result},
  ingest::{ingest_cycle, retention_cutoff},
};

/// One capture pass: ingest the current board at wall time, then sweep
/// retention. Retention failures are logged, not fatal; the capture result
/// is what the caller cares about. Also the whole of a `--fetch-once` run.
pub async fn capture_once<F, S>(
  feed: &F,
  store: &S,
  season: &str,
  retention_months: u32,
) -> Result<usize>
where
  F: LeaderboardFeed,
  S: LadderStore,
{
  let now = chrono::Utc::now().timestamp();
  let count = ingest_cycle(feed, store, season, now).await?;
  match store
    .retention_sweep(retention_cutoff(now, retention_months))
    .await
    .map_err(|e| Error::Store(Box::new(e)))
  {
    Ok(0) => {}
    Ok(deleted) => tracing::info!("retention sweep deleted {deleted} rows"),
    Err(error) => tracing::warn!("retention sweep failed: {error}"),
  }
  Ok(count)
}

/// Capture the board for `season` every `interval_secs`.
pub async fn run_ingest_loop<F, S>(
  feed: Arc<F>,
  store: Arc<S>,
  season: String,
  interval_secs: u64,
  retention_months: u32,
) where
  F: LeaderboardFeed,
  S: LadderStore,
{
  let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
  interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
  loop {
    interval.tick().await;
    match capture_once(feed.as_ref(), store.as_ref(), &season, retention_months)
      .await
    {
      Ok(count) => tracing::info!("captured {count} rows for season {season}"),
      Err(error) => tracing::warn!("capture cycle failed: {error}"),
    }
  }
}

/// Sweep every guild's tier roles for `season` every `interval_secs`.
pub async fn run_reconcile_loop<G, S>(
  reconciler: Arc<Reconciler<G, S>>,
  season: String,
  interval_secs: u64,
) where
  G: GuildGateway,
  S: LadderStore,
{
  let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
  interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
  loop {
    interval.tick().await;
    if let Err(error) = reconciler.reconcile_all(&season).await {
      tracing::warn!("reconcile sweep failed: {error}");
    }
  }
}
