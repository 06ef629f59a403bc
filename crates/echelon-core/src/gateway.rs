//! The `GuildGateway` trait — the chat-platform seam.
//!
//! Role reconciliation talks to the platform exclusively through this trait.
//! `echelon-discord` provides the REST implementation; tests use in-memory
//! fakes.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// A guild (server) the bot account is a member of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRef {
  pub id:   String,
  pub name: String,
}

/// A role within a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
  pub id:   String,
  pub name: String,
}

/// A guild member and the roles they currently hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
  pub account_id: String,
  pub role_ids:   Vec<String>,
}

/// Abstraction over the chat platform's guild/role/member surface.
///
/// Every call reflects current remote state. Implementations hold no member
/// or role caches, so reconciliation decisions are always made against fresh
/// data.
pub trait GuildGateway: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All guilds the bot account can see.
  fn guilds(
    &self,
  ) -> impl Future<Output = Result<Vec<GuildRef>, Self::Error>> + Send + '_;

  /// All roles defined in a guild.
  fn roles<'a>(
    &'a self,
    guild_id: &'a str,
  ) -> impl Future<Output = Result<Vec<RoleRef>, Self::Error>> + Send + 'a;

  /// Create a hoisted role. `reason` lands in the platform's audit log.
  fn create_role<'a>(
    &'a self,
    guild_id: &'a str,
    name: &'a str,
    reason: &'a str,
  ) -> impl Future<Output = Result<RoleRef, Self::Error>> + Send + 'a;

  /// Fetch a member. `Ok(None)` when the account is not in the guild.
  fn member<'a>(
    &'a self,
    guild_id: &'a str,
    account_id: &'a str,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + 'a;

  fn add_member_role<'a>(
    &'a self,
    guild_id: &'a str,
    account_id: &'a str,
    role_id: &'a str,
    reason: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn remove_member_role<'a>(
    &'a self,
    guild_id: &'a str,
    account_id: &'a str,
    role_id: &'a str,
    reason: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
