//! Async HTTP client for the upstream leaderboard API.

use std::time::Duration;

use echelon_core::feed::{FeedEntry, LeaderboardFeed};
use reqwest::Client;

use crate::{Error, Result, payload};

/// Fetches leaderboard state over HTTP.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FeedClient {
  client:   Client,
  base_url: String,
}

impl FeedClient {
  /// Build a client against `base_url` (scheme and host, no trailing path).
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client =
      Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, season: &str) -> String {
    format!(
      "{}/v1/leaderboard/{season}/crossplay",
      self.base_url.trim_end_matches('/')
    )
  }
}

impl LeaderboardFeed for FeedClient {
  type Error = Error;

  /// `GET {base}/v1/leaderboard/{season}/crossplay`
  async fn fetch(&self, season: &str) -> Result<Vec<FeedEntry>> {
    let resp = self.client.get(self.url(season)).send().await?;
    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }
    let body = resp.text().await?;
    payload::decode(&body)
  }
}
