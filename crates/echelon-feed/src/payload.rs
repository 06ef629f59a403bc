//! Decoding of the upstream leaderboard payload.
//!
//! The upstream API wraps rows in `{"data": [...]}` with camelCase field
//! names. Unknown extra fields are ignored; anything that fails to
//! deserialise into the expected shape rejects the whole payload.

use echelon_core::feed::FeedEntry;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Deserialize)]
struct Payload {
  data: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
  name:          String,
  rank:          u32,
  rank_score:    i64,
  league:        Option<String>,
  league_number: Option<u32>,
  club_tag:      Option<String>,
}

impl From<Entry> for FeedEntry {
  fn from(entry: Entry) -> Self {
    FeedEntry {
      name:       entry.name,
      rank:       entry.rank,
      score:      entry.rank_score,
      tier_label: entry.league,
      tier_index: entry.league_number,
      club_tag:   entry.club_tag,
    }
  }
}

/// Decode a raw response body into feed entries.
pub fn decode(body: &str) -> Result<Vec<FeedEntry>> {
  let payload: Payload = serde_json::from_str(body)?;
  Ok(payload.data.into_iter().map(FeedEntry::from).collect())
}
