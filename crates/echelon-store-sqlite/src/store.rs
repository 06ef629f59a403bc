//! [`SqliteStore`] — the SQLite implementation of [`LadderStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use echelon_core::{
  snapshot::Snapshot,
  store::{LadderStore, Registration},
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// Maps a row selected with the canonical snapshot column order.
fn snapshot_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Snapshot> {
  Ok(Snapshot {
    entity_name: row.get(0)?,
    rank:        row.get(1)?,
    score:       row.get(2)?,
    tier_label:  row.get(3)?,
    tier_index:  row.get(4)?,
    club_tag:    row.get(5)?,
    captured_at: row.get(6)?,
    season:      row.get(7)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ladder store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── LadderStore impl ────────────────────────────────────────────────────────

impl LadderStore for SqliteStore {
  type Error = Error;

  // ── Snapshots ─────────────────────────────────────────────────────────────

  async fn append(&self, batch: Vec<Snapshot>) -> Result<()> {
    if batch.is_empty() {
      return Ok(());
    }

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO snapshots (
               entity_name, rank, score, tier_label, tier_index,
               club_tag, captured_at, season
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for row in &batch {
            stmt.execute(rusqlite::params![
              row.entity_name,
              row.rank,
              row.score,
              row.tier_label,
              row.tier_index,
              row.club_tag,
              row.captured_at,
              row.season,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn latest_captured_at(&self, season: &str) -> Result<Option<i64>> {
    let season = season.to_owned();

    let latest = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT MAX(captured_at) FROM snapshots WHERE season = ?1",
          rusqlite::params![season],
          |row| row.get::<_, Option<i64>>(0),
        )?)
      })
      .await?;
    Ok(latest)
  }

  async fn search(
    &self,
    pattern: &str,
    since: i64,
    season: &str,
  ) -> Result<Vec<Snapshot>> {
    let pattern = format!("%{pattern}%");
    let season = season.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entity_name, rank, score, tier_label, tier_index,
                  club_tag, captured_at, season
           FROM snapshots
           WHERE season = ?1 AND captured_at >= ?2 AND entity_name LIKE ?3
           ORDER BY captured_at ASC",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![season, since, pattern],
            snapshot_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn top_n(&self, season: &str, limit: u32) -> Result<Vec<Snapshot>> {
    let season = season.to_owned();
    let limit = i64::from(limit);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entity_name, rank, score, tier_label, tier_index,
                  club_tag, captured_at, season
           FROM snapshots
           WHERE season = ?1
             AND captured_at =
               (SELECT MAX(captured_at) FROM snapshots WHERE season = ?1)
           ORDER BY rank ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![season, limit], snapshot_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn by_names(
    &self,
    names: &[String],
    season: &str,
    at_or_before: Option<i64>,
  ) -> Result<Vec<Snapshot>> {
    if names.is_empty() {
      return Ok(Vec::new());
    }

    let names = names.to_vec();
    let season = season.to_owned();
    // No cutoff means "each name's latest row", which is the same query with
    // an unreachable cutoff.
    let cutoff = at_or_before.unwrap_or(i64::MAX);

    let rows = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
          "SELECT s.entity_name, s.rank, s.score, s.tier_label, s.tier_index,
                  s.club_tag, s.captured_at, s.season
           FROM snapshots s
           JOIN (
             SELECT entity_name, MAX(captured_at) AS captured_at
             FROM snapshots
             WHERE season = ? AND captured_at <= ?
               AND entity_name IN ({placeholders})
             GROUP BY entity_name
           ) latest
             ON latest.entity_name = s.entity_name
            AND latest.captured_at = s.captured_at
           WHERE s.season = ?
           ORDER BY s.rank ASC"
        );

        let mut params: Vec<&dyn rusqlite::ToSql> =
          Vec::with_capacity(names.len() + 3);
        params.push(&season);
        params.push(&cutoff);
        for name in &names {
          params.push(name);
        }
        params.push(&season);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params.as_slice(), snapshot_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn window_around(
    &self,
    entity_name: &str,
    season: &str,
    limit: u32,
  ) -> Result<Vec<Snapshot>> {
    let entity_name = entity_name.to_owned();
    let season = season.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        let latest: Option<i64> = conn.query_row(
          "SELECT MAX(captured_at) FROM snapshots WHERE season = ?1",
          rusqlite::params![season],
          |row| row.get(0),
        )?;
        let Some(latest) = latest else {
          return Ok(Vec::new());
        };

        let rank: Option<u32> = conn
          .query_row(
            "SELECT rank FROM snapshots
             WHERE season = ?1 AND captured_at = ?2 AND entity_name = ?3
             LIMIT 1",
            rusqlite::params![season, latest, entity_name],
            |row| row.get(0),
          )
          .optional()?;
        let Some(rank) = rank else {
          return Ok(Vec::new());
        };

        let offset = std::cmp::max(1, i64::from(rank) - i64::from(limit / 2));
        let upper = offset + i64::from(limit) - 1;

        let mut stmt = conn.prepare(
          "SELECT entity_name, rank, score, tier_label, tier_index,
                  club_tag, captured_at, season
           FROM snapshots
           WHERE season = ?1 AND captured_at = ?2
             AND rank BETWEEN ?3 AND ?4
           ORDER BY rank ASC",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![season, latest, offset, upper],
            snapshot_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn retention_sweep(&self, cutoff: i64) -> Result<usize> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM snapshots
           WHERE captured_at < ?1
             AND captured_at < (
               SELECT MAX(captured_at) FROM snapshots AS s2
               WHERE s2.entity_name = snapshots.entity_name
                 AND s2.season = snapshots.season
             )",
          rusqlite::params![cutoff],
        )?)
      })
      .await?;
    Ok(deleted)
  }

  // ── Registrations ─────────────────────────────────────────────────────────

  async fn register(
    &self,
    account_id: &str,
    entity_name: &str,
  ) -> Result<Registration> {
    let registration = Registration {
      account_id:    account_id.to_owned(),
      entity_name:   entity_name.to_owned(),
      registered_at: Utc::now().timestamp(),
    };

    let row = registration.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO registrations (account_id, entity_name, registered_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (account_id) DO UPDATE SET
             entity_name   = excluded.entity_name,
             registered_at = excluded.registered_at",
          rusqlite::params![row.account_id, row.entity_name, row.registered_at],
        )?;
        Ok(())
      })
      .await?;

    Ok(registration)
  }

  async fn registration(
    &self,
    account_id: &str,
  ) -> Result<Option<Registration>> {
    let account_id = account_id.to_owned();

    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT account_id, entity_name, registered_at
               FROM registrations WHERE account_id = ?1",
              rusqlite::params![account_id],
              |row| {
                Ok(Registration {
                  account_id:    row.get(0)?,
                  entity_name:   row.get(1)?,
                  registered_at: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn registrations(&self) -> Result<Vec<Registration>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT account_id, entity_name, registered_at
           FROM registrations ORDER BY account_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Registration {
              account_id:    row.get(0)?,
              entity_name:   row.get(1)?,
              registered_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Tier-role map ─────────────────────────────────────────────────────────

  async fn role_id(
    &self,
    guild_id: &str,
    tier_label: &str,
  ) -> Result<Option<String>> {
    let guild_id = guild_id.to_owned();
    let tier_label = tier_label.to_owned();

    let id = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT role_id FROM tier_roles
               WHERE guild_id = ?1 AND tier_label = ?2",
              rusqlite::params![guild_id, tier_label],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(id)
  }

  async fn save_role_id(
    &self,
    guild_id: &str,
    tier_label: &str,
    role_id: &str,
  ) -> Result<()> {
    let guild_id = guild_id.to_owned();
    let tier_label = tier_label.to_owned();
    let role_id = role_id.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tier_roles (guild_id, tier_label, role_id)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (guild_id, tier_label) DO UPDATE SET
             role_id = excluded.role_id",
          rusqlite::params![guild_id, tier_label, role_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
