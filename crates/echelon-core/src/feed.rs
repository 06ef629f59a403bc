//! The upstream leaderboard feed — entry type and fetch trait.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// One row of an upstream leaderboard payload, before capture stamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
  pub name:       String,
  pub rank:       u32,
  pub score:      i64,
  pub tier_label: Option<String>,
  pub tier_index: Option<u32>,
  pub club_tag:   Option<String>,
}

impl FeedEntry {
  /// Stamp this entry into a persistable [`Snapshot`].
  pub fn into_snapshot(self, season: &str, captured_at: i64) -> Snapshot {
    Snapshot {
      entity_name: self.name,
      rank:        self.rank,
      score:       self.score,
      tier_label:  self.tier_label.unwrap_or_default(),
      tier_index:  self.tier_index.unwrap_or(0),
      club_tag:    self.club_tag,
      captured_at,
      season:      season.to_owned(),
    }
  }
}

/// Source of current leaderboard state, one season per call.
///
/// Implementations are stateless with respect to seasons; the caller passes
/// the season on every call rather than configuring it once.
pub trait LeaderboardFeed: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the complete current leaderboard for `season`.
  fn fetch<'a>(
    &'a self,
    season: &'a str,
  ) -> impl Future<Output = Result<Vec<FeedEntry>, Self::Error>> + Send + 'a;
}
