//! The reconciliation engine.

use std::{collections::BTreeMap, sync::Arc};

use echelon_core::{
  gateway::GuildGateway,
  store::{LadderStore, Registration},
  tier::{Tier, desired_tier},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Audit-log reason attached to created tier roles.
const CREATE_REASON: &str = "Echelon tier role";
/// Audit-log reason attached to member role changes.
const SYNC_REASON: &str = "Echelon tier reconciliation";

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What happened to a single member during reconciliation.
///
/// Every variant is a normal result, not an error; gateway and store
/// failures surface as [`Error`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MemberOutcome {
  /// The registered entity has no snapshot this season.
  NoSnapshot,
  /// The latest snapshot confers no tier (unknown division label).
  NoTier,
  /// The desired tier's role is missing in the guild and could not be
  /// created this cycle.
  RoleUnavailable,
  /// The account is not a member of the guild.
  MemberAbsent,
  /// The member already holds exactly the desired role.
  InSync,
  /// The member held the desired role plus stale tier roles, which were
  /// removed.
  Cleaned { removed: usize },
  /// The desired role was granted; any stale tier roles were removed
  /// first.
  Assigned { removed: usize },
}

/// Tallies for one reconciliation sweep.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct SweepReport {
  /// Guilds visited, including ones that failed role resolution.
  pub guilds:  usize,
  /// Members confirmed or brought in sync.
  pub synced:  usize,
  /// Members with nothing to do (no snapshot, no tier, no role, not in
  /// the guild).
  pub skipped: usize,
  /// Members or guilds that errored; the sweep continued past them.
  pub failed:  usize,
}

impl SweepReport {
  fn merge(&mut self, other: SweepReport) {
    self.guilds += other.guilds;
    self.synced += other.synced;
    self.skipped += other.skipped;
    self.failed += other.failed;
  }
}

// ─── Reconciler ──────────────────────────────────────────────────────────────

/// Drives guild roles toward the ladder's current state.
///
/// Holds shared handles to a gateway and a store; the daemon's scheduler
/// and the HTTP API share one instance behind an `Arc`.
pub struct Reconciler<G, S> {
  gateway: Arc<G>,
  store:   Arc<S>,
}

impl<G, S> Reconciler<G, S>
where
  G: GuildGateway,
  S: LadderStore,
{
  pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
    Self { gateway, store }
  }

  /// Resolve every tier to a role id in `guild_id`, creating missing
  /// roles.
  ///
  /// Resolution order per tier: the persisted role id (if the role still
  /// exists), then a case-insensitive name match, then creation. Walks
  /// [`Tier::LADDER`] best-first so freshly created roles land in ladder
  /// order. A tier whose role cannot be created is left out of the map
  /// for this cycle; enumeration failure aborts the whole guild.
  pub async fn ensure_roles_exist(
    &self,
    guild_id: &str,
  ) -> Result<BTreeMap<Tier, String>> {
    let existing = self
      .gateway
      .roles(guild_id)
      .await
      .map_err(|e| Error::Gateway(Box::new(e)))?;

    let mut map = BTreeMap::new();
    for tier in Tier::LADDER {
      let label = tier.label();

      let stored = self
        .store
        .role_id(guild_id, label)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      let mut role = stored
        .and_then(|id| existing.iter().find(|r| r.id == id))
        .cloned();

      if role.is_none() {
        role = existing
          .iter()
          .find(|r| r.name.eq_ignore_ascii_case(label))
          .cloned();
      }

      let role = match role {
        Some(role) => role,
        None => {
          match self.gateway.create_role(guild_id, label, CREATE_REASON).await
          {
            Ok(role) => {
              tracing::info!("created role {label} in guild {guild_id}");
              role
            }
            Err(error) => {
              tracing::warn!(
                "could not create role {label} in guild {guild_id}: {error}"
              );
              continue;
            }
          }
        }
      };

      self
        .store
        .save_role_id(guild_id, label, &role.id)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      map.insert(tier, role.id);
    }

    Ok(map)
  }

  /// Reconcile one member of one guild against the ladder.
  ///
  /// `roles` comes from [`ensure_roles_exist`](Self::ensure_roles_exist).
  /// The member ends up holding the role for their current tier and none
  /// of the other tracked tier roles; untracked roles are never touched.
  pub async fn reconcile_one(
    &self,
    guild_id: &str,
    roles: &BTreeMap<Tier, String>,
    account_id: &str,
    entity_name: &str,
    season: &str,
  ) -> Result<MemberOutcome> {
    let rows = self
      .store
      .by_names(&[entity_name.to_owned()], season, None)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    let Some(snapshot) = rows.first() else {
      return Ok(MemberOutcome::NoSnapshot);
    };

    let Some(tier) = desired_tier(snapshot.rank, &snapshot.tier_label) else {
      return Ok(MemberOutcome::NoTier);
    };
    let Some(target) = roles.get(&tier).map(String::as_str) else {
      return Ok(MemberOutcome::RoleUnavailable);
    };

    let Some(member) = self
      .gateway
      .member(guild_id, account_id)
      .await
      .map_err(|e| Error::Gateway(Box::new(e)))?
    else {
      return Ok(MemberOutcome::MemberAbsent);
    };

    // Tracked tier roles the member holds that are not the target.
    let stale: Vec<&str> = roles
      .values()
      .map(String::as_str)
      .filter(|&id| id != target && member.role_ids.iter().any(|r| r == id))
      .collect();
    let has_target = member.role_ids.iter().any(|r| r == target);

    for role_id in &stale {
      self
        .gateway
        .remove_member_role(guild_id, account_id, role_id, SYNC_REASON)
        .await
        .map_err(|e| Error::Gateway(Box::new(e)))?;
    }

    if has_target {
      if stale.is_empty() {
        Ok(MemberOutcome::InSync)
      } else {
        Ok(MemberOutcome::Cleaned { removed: stale.len() })
      }
    } else {
      self
        .gateway
        .add_member_role(guild_id, account_id, target, SYNC_REASON)
        .await
        .map_err(|e| Error::Gateway(Box::new(e)))?;
      Ok(MemberOutcome::Assigned { removed: stale.len() })
    }
  }

  /// Reconcile every registration in one guild.
  ///
  /// Failures are contained per member: one broken member is logged,
  /// counted and stepped over. Only role resolution failing for the
  /// whole guild errors out (and even then, the sweep-level caller
  /// contains it).
  pub async fn reconcile_guild(
    &self,
    guild_id: &str,
    season: &str,
  ) -> Result<SweepReport> {
    let registrations = self
      .store
      .registrations()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    Ok(self.sweep_guild(guild_id, &registrations, season).await)
  }

  /// Reconcile every guild the bot can see against `season`.
  ///
  /// Never fails partway: per-guild and per-member errors are logged and
  /// tallied in the report. Only the initial guild and registration
  /// listings can fail the sweep outright.
  pub async fn reconcile_all(&self, season: &str) -> Result<SweepReport> {
    let registrations = self
      .store
      .registrations()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    if registrations.is_empty() {
      tracing::info!("no registrations; nothing to reconcile");
      return Ok(SweepReport::default());
    }

    let guilds = self
      .gateway
      .guilds()
      .await
      .map_err(|e| Error::Gateway(Box::new(e)))?;

    let mut report = SweepReport::default();
    for guild in &guilds {
      report.merge(self.sweep_guild(&guild.id, &registrations, season).await);
    }

    tracing::info!(
      "reconciled {} guild(s): {} synced, {} skipped, {} failed",
      report.guilds,
      report.synced,
      report.skipped,
      report.failed,
    );
    Ok(report)
  }

  async fn sweep_guild(
    &self,
    guild_id: &str,
    registrations: &[Registration],
    season: &str,
  ) -> SweepReport {
    let mut report = SweepReport { guilds: 1, ..SweepReport::default() };

    let roles = match self.ensure_roles_exist(guild_id).await {
      Ok(roles) => roles,
      Err(error) => {
        tracing::warn!("skipping guild {guild_id}: {error}");
        report.failed += 1;
        return report;
      }
    };

    for registration in registrations {
      let outcome = self
        .reconcile_one(
          guild_id,
          &roles,
          &registration.account_id,
          &registration.entity_name,
          season,
        )
        .await;
      match outcome {
        Ok(
          MemberOutcome::InSync
          | MemberOutcome::Cleaned { .. }
          | MemberOutcome::Assigned { .. },
        ) => report.synced += 1,
        Ok(outcome) => {
          tracing::debug!(
            "skipped {} in guild {guild_id}: {outcome:?}",
            registration.account_id,
          );
          report.skipped += 1;
        }
        Err(error) => {
          tracing::warn!(
            "failed to reconcile {} in guild {guild_id}: {error}",
            registration.account_id,
          );
          report.failed += 1;
        }
      }
    }

    report
  }
}
