//! Handlers for `/registrations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `PUT` | `/registrations/:account_id` | Body: [`RegisterBody`]; upserts, returns 201 + stored row |
//! | `GET` | `/registrations` | All registrations, account id order |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use echelon_core::store::{LadderStore, Registration};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// JSON body accepted by `PUT /registrations/:account_id`.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  /// Exact leaderboard entity name the account wants to follow.
  pub entity_name: String,
}

/// `PUT /registrations/:account_id` — last write wins.
pub async fn put_one<G, S>(
  State(state): State<ApiState<G, S>>,
  Path(account_id): Path<String>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LadderStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entity_name = body.entity_name.trim();
  if entity_name.is_empty() {
    return Err(ApiError::BadRequest("entity_name must not be empty".into()));
  }

  let registration = state
    .store
    .register(&account_id, entity_name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(registration)))
}

/// `GET /registrations`
pub async fn list<G, S>(
  State(state): State<ApiState<G, S>>,
) -> Result<Json<Vec<Registration>>, ApiError>
where
  S: LadderStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let registrations = state
    .store
    .registrations()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(registrations))
}
