//! [`RestGateway`] — the Discord REST implementation of [`GuildGateway`].

use std::time::Duration;

use echelon_core::gateway::{GuildGateway, GuildRef, Member, RoleRef};
use reqwest::{Client, Method, StatusCode, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10";
const AUDIT_REASON_HEADER: &str = "X-Audit-Log-Reason";

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawGuild {
  id:   String,
  name: String,
}

#[derive(Debug, Deserialize)]
struct RawRole {
  id:   String,
  name: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
  id: String,
}

#[derive(Debug, Deserialize)]
struct RawMember {
  user:  RawUser,
  roles: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CreateRole<'a> {
  name:  &'a str,
  hoist: bool,
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Async client for the Discord REST API, scoped to one bot token.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RestGateway {
  client:   Client,
  base_url: String,
  token:    String,
}

impl RestGateway {
  pub fn new(token: impl Into<String>) -> Result<Self> {
    Self::with_base_url(token, DEFAULT_BASE_URL)
  }

  /// Build a gateway against a non-default base URL — useful for testing.
  pub fn with_base_url(
    token: impl Into<String>,
    base_url: impl Into<String>,
  ) -> Result<Self> {
    let client =
      Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      client,
      base_url: base_url.into(),
      token: token.into(),
    })
  }

  fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
    let url =
      format!("{}{path}", self.base_url.trim_end_matches('/'));
    self
      .client
      .request(method, url)
      .header(AUTHORIZATION, format!("Bot {}", self.token))
  }

  fn check(
    endpoint: &str,
    resp: reqwest::Response,
  ) -> Result<reqwest::Response> {
    if resp.status().is_success() {
      Ok(resp)
    } else {
      Err(Error::Status {
        endpoint: endpoint.to_owned(),
        status:   resp.status(),
      })
    }
  }
}

impl GuildGateway for RestGateway {
  type Error = Error;

  /// `GET /users/@me/guilds`
  async fn guilds(&self) -> Result<Vec<GuildRef>> {
    let resp =
      self.request(Method::GET, "/users/@me/guilds").send().await?;
    let resp = Self::check("GET /users/@me/guilds", resp)?;

    let raw: Vec<RawGuild> = resp.json().await?;
    Ok(
      raw
        .into_iter()
        .map(|g| GuildRef { id: g.id, name: g.name })
        .collect(),
    )
  }

  /// `GET /guilds/{guild_id}/roles`
  async fn roles(&self, guild_id: &str) -> Result<Vec<RoleRef>> {
    let path = format!("/guilds/{guild_id}/roles");
    let resp = self.request(Method::GET, &path).send().await?;
    let resp = Self::check("GET /guilds/:id/roles", resp)?;

    let raw: Vec<RawRole> = resp.json().await?;
    Ok(
      raw
        .into_iter()
        .map(|r| RoleRef { id: r.id, name: r.name })
        .collect(),
    )
  }

  /// `POST /guilds/{guild_id}/roles` — hoisted so the role groups members
  /// in the sidebar.
  async fn create_role(
    &self,
    guild_id: &str,
    name: &str,
    reason: &str,
  ) -> Result<RoleRef> {
    let path = format!("/guilds/{guild_id}/roles");
    let resp = self
      .request(Method::POST, &path)
      .header(AUDIT_REASON_HEADER, reason)
      .json(&CreateRole { name, hoist: true })
      .send()
      .await?;
    let resp = Self::check("POST /guilds/:id/roles", resp)?;

    let raw: RawRole = resp.json().await?;
    Ok(RoleRef { id: raw.id, name: raw.name })
  }

  /// `GET /guilds/{guild_id}/members/{account_id}`; 404 means the account
  /// is not (or no longer) in the guild.
  async fn member(
    &self,
    guild_id: &str,
    account_id: &str,
  ) -> Result<Option<Member>> {
    let path = format!("/guilds/{guild_id}/members/{account_id}");
    let resp = self.request(Method::GET, &path).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let resp = Self::check("GET /guilds/:id/members/:id", resp)?;

    let raw: RawMember = resp.json().await?;
    Ok(Some(Member { account_id: raw.user.id, role_ids: raw.roles }))
  }

  /// `PUT /guilds/{guild_id}/members/{account_id}/roles/{role_id}`
  async fn add_member_role(
    &self,
    guild_id: &str,
    account_id: &str,
    role_id: &str,
    reason: &str,
  ) -> Result<()> {
    let path =
      format!("/guilds/{guild_id}/members/{account_id}/roles/{role_id}");
    let resp = self
      .request(Method::PUT, &path)
      .header(AUDIT_REASON_HEADER, reason)
      .send()
      .await?;
    Self::check("PUT /guilds/:id/members/:id/roles/:id", resp)?;
    Ok(())
  }

  /// `DELETE /guilds/{guild_id}/members/{account_id}/roles/{role_id}`
  async fn remove_member_role(
    &self,
    guild_id: &str,
    account_id: &str,
    role_id: &str,
    reason: &str,
  ) -> Result<()> {
    let path =
      format!("/guilds/{guild_id}/members/{account_id}/roles/{role_id}");
    let resp = self
      .request(Method::DELETE, &path)
      .header(AUDIT_REASON_HEADER, reason)
      .send()
      .await?;
    Self::check("DELETE /guilds/:id/members/:id/roles/:id", resp)?;
    Ok(())
  }
}
