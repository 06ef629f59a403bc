//! SQL schema for the Echelon SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Snapshots are strictly append-only. No UPDATE is ever issued against this
-- table; the only DELETE is the retention sweep, which must spare every
-- row sitting at its entity's per-season latest captured_at.
-- (entity_name, captured_at) is deliberately not unique.
CREATE TABLE IF NOT EXISTS snapshots (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_name  TEXT    NOT NULL,
    rank         INTEGER NOT NULL,
    score        INTEGER NOT NULL,
    tier_label   TEXT    NOT NULL DEFAULT '',
    tier_index   INTEGER NOT NULL DEFAULT 0,
    club_tag     TEXT,
    captured_at  INTEGER NOT NULL,   -- unix seconds; one value per ingest batch
    season       TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS registrations (
    account_id    TEXT PRIMARY KEY,
    entity_name   TEXT    NOT NULL,
    registered_at INTEGER NOT NULL   -- unix seconds; store-assigned
);

-- One guild role per (guild, tier); upserted whenever reconciliation has to
-- re-resolve or re-create a role.
CREATE TABLE IF NOT EXISTS tier_roles (
    guild_id   TEXT NOT NULL,
    tier_label TEXT NOT NULL,
    role_id    TEXT NOT NULL,
    PRIMARY KEY (guild_id, tier_label)
);

CREATE INDEX IF NOT EXISTS snapshots_name_time_idx   ON snapshots(entity_name, captured_at, season);
CREATE INDEX IF NOT EXISTS snapshots_season_time_idx ON snapshots(season, captured_at);

PRAGMA user_version = 1;
";
