//! Snapshot records — the append-only unit of ladder history.

use serde::{Deserialize, Serialize};

/// One leaderboard row as observed at a single capture instant.
///
/// Rows are immutable once written; history for an entity is the set of its
/// rows across capture instants. The "current" state of a season is whatever
/// sits at the largest `captured_at`, recomputed per query and never cached.
/// Nothing makes `(entity_name, captured_at)` unique — two rows for the same
/// name at the same instant are both kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
  pub entity_name: String,
  /// 1 is the best rank.
  pub rank:        u32,
  pub score:       i64,
  /// Upstream division label, e.g. `"Diamond 1"`. Empty when the upstream
  /// payload omitted it.
  pub tier_label:  String,
  /// Numeric division sent alongside the label; 0 when omitted.
  pub tier_index:  u32,
  pub club_tag:    Option<String>,
  /// Unix seconds, assigned once per ingest batch.
  pub captured_at: i64,
  /// Partition label; every query is scoped to exactly one season.
  pub season:      String,
}
