//! Integration tests for `SqliteStore` against an in-memory database.

use echelon_core::{snapshot::Snapshot, store::LadderStore};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn snap(name: &str, rank: u32, captured_at: i64) -> Snapshot {
  Snapshot {
    entity_name: name.into(),
    rank,
    score: i64::from(rank) * 100,
    tier_label: "Gold 1".into(),
    tier_index: 9,
    club_tag: None,
    captured_at,
    season: "s7".into(),
  }
}

fn names(rows: &[Snapshot]) -> Vec<&str> {
  rows.iter().map(|s| s.entity_name.as_str()).collect()
}

fn ranks(rows: &[Snapshot]) -> Vec<u32> {
  rows.iter().map(|s| s.rank).collect()
}

// ─── Append & latest ─────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_is_none_for_an_empty_season() {
  let s = store().await;
  assert_eq!(s.latest_captured_at("s7").await.unwrap(), None);
}

#[tokio::test]
async fn latest_follows_every_append() {
  let s = store().await;

  s.append(vec![snap("Alice#1", 1, 100), snap("Bob#2", 2, 100)])
    .await
    .unwrap();
  assert_eq!(s.latest_captured_at("s7").await.unwrap(), Some(100));

  s.append(vec![snap("Alice#1", 2, 200)]).await.unwrap();
  assert_eq!(s.latest_captured_at("s7").await.unwrap(), Some(200));
}

#[tokio::test]
async fn latest_is_scoped_per_season() {
  let s = store().await;

  let mut other = snap("Alice#1", 1, 500);
  other.season = "s8".into();
  s.append(vec![snap("Alice#1", 1, 100), other]).await.unwrap();

  assert_eq!(s.latest_captured_at("s7").await.unwrap(), Some(100));
  assert_eq!(s.latest_captured_at("s8").await.unwrap(), Some(500));
  assert_eq!(s.latest_captured_at("s9").await.unwrap(), None);
}

#[tokio::test]
async fn appending_an_empty_batch_writes_nothing() {
  let s = store().await;
  s.append(Vec::new()).await.unwrap();
  assert_eq!(s.latest_captured_at("s7").await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_rows_at_one_instant_are_both_kept() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 1, 100), snap("Alice#1", 1, 100)])
    .await
    .unwrap();

  let rows = s.search("Alice", 0, "s7").await.unwrap();
  assert_eq!(rows.len(), 2);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_is_a_case_insensitive_substring_match() {
  let s = store().await;
  s.append(vec![
    snap("Alice#1", 1, 10),
    snap("malice#2", 2, 15),
    snap("Bob#3", 3, 20),
  ])
  .await
  .unwrap();

  let rows = s.search("ALICE", 0, "s7").await.unwrap();
  assert_eq!(names(&rows), vec!["Alice#1", "malice#2"]);
}

#[tokio::test]
async fn search_orders_by_capture_time_and_honours_since() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 3, 30)]).await.unwrap();
  s.append(vec![snap("Alice#1", 1, 10)]).await.unwrap();
  s.append(vec![snap("Alice#1", 2, 20)]).await.unwrap();

  let rows = s.search("Alice", 0, "s7").await.unwrap();
  assert_eq!(ranks(&rows), vec![1, 2, 3]);

  let recent = s.search("Alice", 20, "s7").await.unwrap();
  assert_eq!(ranks(&recent), vec![2, 3]);
}

#[tokio::test]
async fn search_misses_are_empty_not_errors() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 1, 10)]).await.unwrap();

  assert!(s.search("zzz", 0, "s7").await.unwrap().is_empty());
  assert!(s.search("Alice", 0, "s8").await.unwrap().is_empty());
}

// ─── Leaderboard queries ─────────────────────────────────────────────────────

#[tokio::test]
async fn top_n_reads_only_the_latest_capture() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 1, 100), snap("Bob#2", 2, 100)])
    .await
    .unwrap();
  s.append(vec![snap("Alice#1", 2, 200), snap("Bob#2", 1, 200)])
    .await
    .unwrap();

  let rows = s.top_n("s7", 10).await.unwrap();
  assert_eq!(names(&rows), vec!["Bob#2", "Alice#1"]);
  assert!(rows.iter().all(|r| r.captured_at == 200));

  let first = s.top_n("s7", 1).await.unwrap();
  assert_eq!(names(&first), vec!["Bob#2"]);
}

#[tokio::test]
async fn top_n_of_an_empty_season_is_empty() {
  let s = store().await;
  assert!(s.top_n("s7", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn by_names_resolves_each_name_to_its_latest_row() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 5, 10), snap("Bob#2", 6, 10)])
    .await
    .unwrap();
  s.append(vec![snap("Alice#1", 3, 20)]).await.unwrap();

  let rows = s
    .by_names(&["Alice#1".into(), "Bob#2".into()], "s7", None)
    .await
    .unwrap();
  assert_eq!(names(&rows), vec!["Alice#1", "Bob#2"]);
  assert_eq!(ranks(&rows), vec![3, 6]);
}

#[tokio::test]
async fn by_names_with_a_cutoff_resolves_to_the_nearest_past_row() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 5, 10), snap("Bob#2", 6, 10)])
    .await
    .unwrap();
  s.append(vec![snap("Alice#1", 3, 20)]).await.unwrap();

  let rows = s
    .by_names(&["Alice#1".into(), "Bob#2".into()], "s7", Some(15))
    .await
    .unwrap();
  assert_eq!(ranks(&rows), vec![5, 6]);

  let none = s
    .by_names(&["Alice#1".into()], "s7", Some(5))
    .await
    .unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn by_names_skips_unknown_names() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 5, 10)]).await.unwrap();

  let rows = s
    .by_names(&["Alice#1".into(), "Nobody#0".into()], "s7", None)
    .await
    .unwrap();
  assert_eq!(names(&rows), vec!["Alice#1"]);

  assert!(s.by_names(&[], "s7", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn window_around_centres_on_the_entity() {
  let s = store().await;
  let batch: Vec<Snapshot> =
    (1..=100).map(|r| snap(&format!("P{r}#0"), r, 50)).collect();
  s.append(batch).await.unwrap();

  let rows = s.window_around("P55#0", "s7", 10).await.unwrap();
  assert_eq!(ranks(&rows), (50..=59).collect::<Vec<u32>>());
}

#[tokio::test]
async fn window_around_clamps_at_the_top_of_the_ladder() {
  let s = store().await;
  let batch: Vec<Snapshot> =
    (1..=100).map(|r| snap(&format!("P{r}#0"), r, 50)).collect();
  s.append(batch).await.unwrap();

  let rows = s.window_around("P3#0", "s7", 10).await.unwrap();
  assert_eq!(ranks(&rows), (1..=10).collect::<Vec<u32>>());
}

#[tokio::test]
async fn window_around_requires_presence_at_the_latest_capture() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 1, 10), snap("Bob#2", 2, 10)])
    .await
    .unwrap();
  s.append(vec![snap("Bob#2", 1, 20)]).await.unwrap();

  // Alice exists historically but not at the latest capture.
  assert!(s.window_around("Alice#1", "s7", 10).await.unwrap().is_empty());
  assert!(s.window_around("Nobody#0", "s7", 10).await.unwrap().is_empty());
}

// ─── Retention ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn retention_sweep_deletes_old_rows_but_spares_latest_ones() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 5, 10)]).await.unwrap();
  s.append(vec![snap("Alice#1", 3, 20)]).await.unwrap();
  // Bob stopped playing long ago; his only row is also his latest.
  s.append(vec![snap("Bob#2", 9, 5)]).await.unwrap();

  let deleted = s.retention_sweep(100).await.unwrap();
  assert_eq!(deleted, 1);

  let alice = s.by_names(&["Alice#1".into()], "s7", None).await.unwrap();
  assert_eq!(ranks(&alice), vec![3]);
  let bob = s.by_names(&["Bob#2".into()], "s7", None).await.unwrap();
  assert_eq!(ranks(&bob), vec![9]);
}

#[tokio::test]
async fn retention_sweep_keeps_rows_at_or_after_the_cutoff() {
  let s = store().await;
  s.append(vec![snap("Alice#1", 5, 10)]).await.unwrap();
  s.append(vec![snap("Alice#1", 4, 50)]).await.unwrap();
  s.append(vec![snap("Alice#1", 3, 90)]).await.unwrap();

  let deleted = s.retention_sweep(50).await.unwrap();
  assert_eq!(deleted, 1);

  let rows = s.search("Alice", 0, "s7").await.unwrap();
  assert_eq!(ranks(&rows), vec![4, 3]);
}

// ─── Registrations ───────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_fetch_roundtrip() {
  let s = store().await;

  let reg = s.register("acct-1", "Alice#1").await.unwrap();
  assert_eq!(reg.account_id, "acct-1");
  assert_eq!(reg.entity_name, "Alice#1");

  let fetched = s.registration("acct-1").await.unwrap().unwrap();
  assert_eq!(fetched.entity_name, "Alice#1");

  assert!(s.registration("acct-2").await.unwrap().is_none());
}

#[tokio::test]
async fn reregistering_overwrites_the_previous_entity() {
  let s = store().await;
  s.register("acct-1", "Alice#1").await.unwrap();
  s.register("acct-1", "Bob#2").await.unwrap();

  let fetched = s.registration("acct-1").await.unwrap().unwrap();
  assert_eq!(fetched.entity_name, "Bob#2");

  assert_eq!(s.registrations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn registrations_lists_all_accounts() {
  let s = store().await;
  s.register("acct-2", "Bob#2").await.unwrap();
  s.register("acct-1", "Alice#1").await.unwrap();

  let all = s.registrations().await.unwrap();
  let accounts: Vec<&str> =
    all.iter().map(|r| r.account_id.as_str()).collect();
  assert_eq!(accounts, vec!["acct-1", "acct-2"]);
}

// ─── Tier-role map ───────────────────────────────────────────────────────────

#[tokio::test]
async fn role_map_upserts_per_guild_and_tier() {
  let s = store().await;

  assert!(s.role_id("guild-1", "Gold").await.unwrap().is_none());

  s.save_role_id("guild-1", "Gold", "role-10").await.unwrap();
  s.save_role_id("guild-1", "Ruby", "role-11").await.unwrap();
  s.save_role_id("guild-2", "Gold", "role-20").await.unwrap();

  assert_eq!(
    s.role_id("guild-1", "Gold").await.unwrap().as_deref(),
    Some("role-10")
  );
  assert_eq!(
    s.role_id("guild-2", "Gold").await.unwrap().as_deref(),
    Some("role-20")
  );

  s.save_role_id("guild-1", "Gold", "role-12").await.unwrap();
  assert_eq!(
    s.role_id("guild-1", "Gold").await.unwrap().as_deref(),
    Some("role-12")
  );
}
