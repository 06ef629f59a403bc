//! Handler for `GET /seasons/:season/overtake`.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Utc;
use echelon_core::{
  overtake::{Overtake, detect},
  resample::SECS_PER_HOUR,
  store::LadderStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// Reference distance when the caller does not provide one.
const DEFAULT_HOURS: u32 = 24;

#[derive(Debug, Deserialize)]
pub struct OvertakeParams {
  /// Comma-separated exact entity names to compare.
  pub names: String,
  /// How far back the reference ranking lies, in hours. Defaults to 24.
  pub hours: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct OvertakeResponse {
  pub overtake: Option<Overtake>,
}

/// `GET /seasons/:season/overtake?names=a,b,c[&hours=24]`
///
/// Compares each name's latest row against its latest row at or before
/// `now − hours`; reports the first rank-order inversion, if any.
pub async fn handler<G, S>(
  State(state): State<ApiState<G, S>>,
  Path(season): Path<String>,
  Query(params): Query<OvertakeParams>,
) -> Result<Json<OvertakeResponse>, ApiError>
where
  S: LadderStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let names: Vec<String> = params
    .names
    .split(',')
    .map(|n| n.trim().to_owned())
    .filter(|n| !n.is_empty())
    .collect();
  if names.is_empty() {
    return Err(ApiError::BadRequest("names must not be empty".into()));
  }

  let hours = params.hours.unwrap_or(DEFAULT_HOURS);
  let cutoff = Utc::now().timestamp() - i64::from(hours) * SECS_PER_HOUR;

  let current = state
    .store
    .by_names(&names, &season, None)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let reference = state
    .store
    .by_names(&names, &season, Some(cutoff))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(OvertakeResponse { overtake: detect(&current, &reference) }))
}
