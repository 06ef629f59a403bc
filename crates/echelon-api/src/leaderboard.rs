//! Handlers for ladder read endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/seasons/:season/latest` | Newest capture timestamp, `null` for an empty season |
//! | `GET` | `/seasons/:season/leaderboard` | Default: top ranks (`?limit`, default 50). `?around=fragment` centres a window on the best match; `?names=a,b[&at=ts]` resolves exact names |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Utc;
use echelon_core::{
  Snapshot, matching::best_match, store::LadderStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// Rows returned when the caller asks for no particular count.
const DEFAULT_LIMIT: u32 = 50;
/// How far back `around` searches for its candidate rows.
const SEARCH_WINDOW_SECS: i64 = 24 * 3600;

// ─── Latest ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LatestResponse {
  /// Unix seconds of the season's newest capture.
  pub captured_at: Option<i64>,
}

/// `GET /seasons/:season/latest`
pub async fn latest<G, S>(
  State(state): State<ApiState<G, S>>,
  Path(season): Path<String>,
) -> Result<Json<LatestResponse>, ApiError>
where
  S: LadderStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let captured_at = state
    .store
    .latest_captured_at(&season)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(LatestResponse { captured_at }))
}

// ─── Leaderboard ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
  pub limit:  Option<u32>,
  /// Fragment to centre a rank window on (resolved via best-match).
  pub around: Option<String>,
  /// Comma-separated exact names.
  pub names:  Option<String>,
  /// With `names`: resolve each name at or before this unix timestamp.
  pub at:     Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
  /// The capture instant the rows reflect; `null` when the season is
  /// empty.
  pub as_of: Option<i64>,
  pub rows:  Vec<Snapshot>,
}

/// `GET /seasons/:season/leaderboard[?limit][&around=frag][&names=a,b][&at=ts]`
///
/// `around` wins over `names`; with neither, the top `limit` ranks at the
/// season's latest capture are returned.
pub async fn list<G, S>(
  State(state): State<ApiState<G, S>>,
  Path(season): Path<String>,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError>
where
  S: LadderStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
  let latest = state
    .store
    .latest_captured_at(&season)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let (as_of, rows) = if let Some(fragment) = &params.around {
    let since = Utc::now().timestamp() - SEARCH_WINDOW_SECS;
    let candidates = state
      .store
      .search(fragment, since, &season)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    let rows = match best_match(fragment, &candidates) {
      Some(found) => state
        .store
        .window_around(&found.entity_name, &season, limit)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?,
      None => Vec::new(),
    };
    (latest, rows)
  } else if let Some(raw) = &params.names {
    let names: Vec<String> = raw
      .split(',')
      .map(|n| n.trim().to_owned())
      .filter(|n| !n.is_empty())
      .collect();
    if names.is_empty() {
      return Err(ApiError::BadRequest("names must not be empty".into()));
    }
    let rows = state
      .store
      .by_names(&names, &season, params.at)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    (params.at.or(latest), rows)
  } else {
    let rows = state
      .store
      .top_n(&season, limit)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    (latest, rows)
  };

  Ok(Json(LeaderboardResponse { as_of, rows }))
}
