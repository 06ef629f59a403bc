//! Handler for `GET /seasons/:season/entities/:name/series`.
//!
//! The `:name` segment is a user-typed fragment, not necessarily an exact
//! entity name; it is resolved against the trailing window via best-match.
//! An unresolvable fragment is an empty series, not a 404.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Utc;
use echelon_core::{
  matching::{MIN_QUERY_LEN, best_match},
  resample::{Metric, SECS_PER_HOUR, SeriesPoint, resample},
  store::LadderStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// Trailing window when the caller does not say how far back to chart.
const DEFAULT_DAYS: u32 = 14;

#[derive(Debug, Deserialize)]
pub struct SeriesParams {
  /// Which column to chart. Defaults to rank.
  #[serde(default)]
  pub metric: Metric,
  /// Trailing window in days. Defaults to 14.
  pub days:   Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
  /// The resolved entity; `null` when nothing matched the fragment.
  pub entity: Option<String>,
  pub metric: Metric,
  /// `captured_at` of the newest record backing the series.
  pub as_of:  Option<i64>,
  pub points: Vec<SeriesPoint>,
}

/// `GET /seasons/:season/entities/:name/series[?metric=rank|score][&days=N]`
pub async fn handler<G, S>(
  State(state): State<ApiState<G, S>>,
  Path((season, name)): Path<(String, String)>,
  Query(params): Query<SeriesParams>,
) -> Result<Json<SeriesResponse>, ApiError>
where
  S: LadderStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if name.chars().count() < MIN_QUERY_LEN {
    return Err(ApiError::BadRequest(format!(
      "name fragment must be at least {MIN_QUERY_LEN} characters"
    )));
  }

  let days = params.days.unwrap_or(DEFAULT_DAYS);
  let hours = days.saturating_mul(24);
  let now = Utc::now().timestamp();
  let since = now - i64::from(hours) * SECS_PER_HOUR;

  let history = state
    .store
    .search(&name, since, &season)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let Some(found) = best_match(&name, &history) else {
    return Ok(Json(SeriesResponse {
      entity: None,
      metric: params.metric,
      as_of:  None,
      points: Vec::new(),
    }));
  };
  let entity = found.entity_name.clone();

  let history: Vec<_> = history
    .into_iter()
    .filter(|s| s.entity_name == entity)
    .collect();
  // `search` orders ascending, so the last row is the newest.
  let as_of = history.last().map(|s| s.captured_at);
  let points = resample(&history, params.metric, hours, now);

  Ok(Json(SeriesResponse {
    entity: Some(entity),
    metric: params.metric,
    as_of,
    points,
  }))
}
