//! JSON REST API for Echelon.
//!
//! Exposes an axum [`Router`] backed by any
//! [`echelon_core::store::LadderStore`] plus an
//! [`echelon_roles::Reconciler`] for on-demand sweeps. Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", echelon_api::api_router(state.clone()))
//! ```

pub mod error;
pub mod leaderboard;
pub mod overtake;
pub mod reconcile;
pub mod registrations;
pub mod series;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use echelon_core::{gateway::GuildGateway, store::LadderStore};
use echelon_roles::Reconciler;

pub use error::ApiError;

/// Shared state behind every handler.
///
/// Both fields are shared handles, so cloning the state clones two `Arc`s.
pub struct ApiState<G, S> {
  pub store:      Arc<S>,
  pub reconciler: Arc<Reconciler<G, S>>,
}

impl<G, S> Clone for ApiState<G, S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      reconciler: Arc::clone(&self.reconciler),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<G, S>(state: ApiState<G, S>) -> Router<()>
where
  G: GuildGateway + 'static,
  S: LadderStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Ladder reads
    .route("/seasons/{season}/latest", get(leaderboard::latest::<G, S>))
    .route("/seasons/{season}/leaderboard", get(leaderboard::list::<G, S>))
    .route(
      "/seasons/{season}/entities/{name}/series",
      get(series::handler::<G, S>),
    )
    .route("/seasons/{season}/overtake", get(overtake::handler::<G, S>))
    // Registrations
    .route("/registrations", get(registrations::list::<G, S>))
    .route(
      "/registrations/{account_id}",
      put(registrations::put_one::<G, S>),
    )
    // Reconciliation triggers
    .route("/guilds/{guild_id}/reconcile", post(reconcile::guild::<G, S>))
    .route(
      "/guilds/{guild_id}/members/{account_id}/reconcile",
      post(reconcile::member::<G, S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
