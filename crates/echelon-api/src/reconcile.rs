//! Handlers for on-demand reconciliation triggers.
//!
//! The scheduler sweeps on its own cadence; these endpoints let the front
//! end force a pass without waiting for the next tick.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/guilds/:guild_id/reconcile` | `?season` required; returns the guild's sweep report |
//! | `POST` | `/guilds/:guild_id/members/:account_id/reconcile` | `?season` required; 404 without a registration |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use echelon_core::{gateway::GuildGateway, store::LadderStore};
use echelon_roles::{MemberOutcome, SweepReport};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SeasonParams {
  /// Season to reconcile against; always explicit, never ambient.
  pub season: String,
}

/// `POST /guilds/:guild_id/reconcile?season=...`
pub async fn guild<G, S>(
  State(state): State<ApiState<G, S>>,
  Path(guild_id): Path<String>,
  Query(params): Query<SeasonParams>,
) -> Result<Json<SweepReport>, ApiError>
where
  G: GuildGateway,
  S: LadderStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report =
    state.reconciler.reconcile_guild(&guild_id, &params.season).await?;
  Ok(Json(report))
}

/// `POST /guilds/:guild_id/members/:account_id/reconcile?season=...`
pub async fn member<G, S>(
  State(state): State<ApiState<G, S>>,
  Path((guild_id, account_id)): Path<(String, String)>,
  Query(params): Query<SeasonParams>,
) -> Result<Json<MemberOutcome>, ApiError>
where
  G: GuildGateway,
  S: LadderStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let registration = state
    .store
    .registration(&account_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no registration for account {account_id}"))
    })?;

  let roles = state.reconciler.ensure_roles_exist(&guild_id).await?;
  let outcome = state
    .reconciler
    .reconcile_one(
      &guild_id,
      &roles,
      &account_id,
      &registration.entity_name,
      &params.season,
    )
    .await?;
  Ok(Json(outcome))
}
