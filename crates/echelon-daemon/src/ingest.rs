//! One capture cycle: fetch the feed, stamp every row, append the batch.
//!
//! The cycle takes `now` as an argument instead of reading the clock so a
//! test can pin the capture instant; [`tasks`](crate::tasks) passes wall
//! time.

use echelon_core::{feed::LeaderboardFeed, store::LadderStore};

use crate::error::{Error, Result};

/// Retention is measured in 30-day months.
const SECS_PER_MONTH: i64 = 30 * 24 * 3600;

/// Fetch the current board for `season` and append it as one batch, every
/// row stamped with the same `captured_at = now`. Returns the number of
/// rows appended. An empty board is a valid cycle that appends nothing.
///
/// A fetch failure appends nothing; the previous capture stays the
/// season's latest.
pub async fn ingest_cycle<F, S>(
  feed: &F,
  store: &S,
  season: &str,
  now: i64,
) -> Result<usize>
where
  F: LeaderboardFeed,
  S: LadderStore,
{
  let entries = feed
    .fetch(season)
    .await
    .map_err(|e| Error::Feed(Box::new(e)))?;
  let count = entries.len();
  let batch = entries
    .into_iter()
    .map(|entry| entry.into_snapshot(season, now))
    .collect();
  store
    .append(batch)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(count)
}

/// The timestamp below which a `months`-month retention sweep may delete.
pub fn retention_cutoff(now: i64, months: u32) -> i64 {
  now - i64::from(months) * SECS_PER_MONTH
}
