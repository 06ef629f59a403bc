//! The `LadderStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `echelon-store-sqlite`). Higher layers (`echelon-api`, `echelon-roles`,
//! `echelon-daemon`) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

// ─── Registration ────────────────────────────────────────────────────────────

/// Links a chat account to the leaderboard entity it follows.
///
/// At most one entity per account; re-registering overwrites. The linkage is
/// by exact name string, so an upstream rename orphans the registration until
/// the account re-registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
  pub account_id:    String,
  pub entity_name:   String,
  /// Unix seconds, set by the store at write time.
  pub registered_at: i64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the ladder snapshot store.
///
/// Snapshot writes are append-only; there are no updates and no single-row
/// deletes. The only destructive operation is
/// [`retention_sweep`](LadderStore::retention_sweep), and it must never touch
/// a row sitting at its entity's per-season latest timestamp.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait LadderStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Snapshots ─────────────────────────────────────────────────────────

  /// Append a capture batch in one transaction: all rows land or none do.
  /// An empty batch is a no-op.
  fn append(
    &self,
    batch: Vec<Snapshot>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The largest `captured_at` recorded for `season`, if any.
  fn latest_captured_at<'a>(
    &'a self,
    season: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  /// Every row whose entity name contains `pattern` (case-insensitive) with
  /// `captured_at >= since`, ordered by `captured_at` ascending.
  /// No match is an empty vec, not an error.
  fn search<'a>(
    &'a self,
    pattern: &'a str,
    since: i64,
    season: &'a str,
  ) -> impl Future<Output = Result<Vec<Snapshot>, Self::Error>> + Send + 'a;

  /// The best `limit` ranks at the season's latest timestamp, rank
  /// ascending. Empty when the season has no data.
  fn top_n<'a>(
    &'a self,
    season: &'a str,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<Snapshot>, Self::Error>> + Send + 'a;

  /// Rows for exactly `names` at one resolved timestamp, rank ascending.
  ///
  /// `at_or_before = None` resolves to each name's latest row;
  /// `Some(cutoff)` resolves to each name's latest row with
  /// `captured_at <= cutoff`. Names with no row at the resolved time are
  /// simply absent from the result.
  fn by_names<'a>(
    &'a self,
    names: &'a [String],
    season: &'a str,
    at_or_before: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Snapshot>, Self::Error>> + Send + 'a;

  /// A window of ranks centred on `entity_name` (exact match) at the
  /// season's latest timestamp: ranks `offset ..= offset + limit - 1` where
  /// `offset = max(1, rank - limit / 2)`. Empty when the entity has no row
  /// at that timestamp.
  fn window_around<'a>(
    &'a self,
    entity_name: &'a str,
    season: &'a str,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<Snapshot>, Self::Error>> + Send + 'a;

  /// Delete rows with `captured_at < cutoff`, sparing every row that sits
  /// at its entity's per-season maximum `captured_at`. Returns the number
  /// of rows deleted.
  fn retention_sweep(
    &self,
    cutoff: i64,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Registrations ─────────────────────────────────────────────────────

  /// Upsert the registration for `account_id`; last write wins. The store
  /// stamps `registered_at`.
  fn register<'a>(
    &'a self,
    account_id: &'a str,
    entity_name: &'a str,
  ) -> impl Future<Output = Result<Registration, Self::Error>> + Send + 'a;

  fn registration<'a>(
    &'a self,
    account_id: &'a str,
  ) -> impl Future<Output = Result<Option<Registration>, Self::Error>> + Send + 'a;

  fn registrations(
    &self,
  ) -> impl Future<Output = Result<Vec<Registration>, Self::Error>> + Send + '_;

  // ── Tier-role map ─────────────────────────────────────────────────────

  /// The persisted role id for `(guild_id, tier_label)`, if one was ever
  /// saved. A stale id (role since deleted in the guild) is the caller's
  /// problem to detect.
  fn role_id<'a>(
    &'a self,
    guild_id: &'a str,
    tier_label: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Upsert the role id for `(guild_id, tier_label)`.
  fn save_role_id<'a>(
    &'a self,
    guild_id: &'a str,
    tier_label: &'a str,
    role_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
