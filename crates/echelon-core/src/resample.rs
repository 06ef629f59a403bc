//! Hourly series resampling with nearest-neighbour fill.
//!
//! Capture cadence is irregular: a batch every few minutes while the ingest
//! loop is healthy, arbitrary gaps when it is not. Charts want a fixed hourly
//! grid, so history is bucketed by containing hour and every empty boundary
//! borrows the value of the nearest populated bucket.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

pub const SECS_PER_HOUR: i64 = 3600;

/// Which snapshot field a series tracks.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
  #[default]
  Rank,
  Score,
}

impl Metric {
  fn of(self, snapshot: &Snapshot) -> i64 {
    match self {
      Self::Rank => i64::from(snapshot.rank),
      Self::Score => snapshot.score,
    }
  }
}

/// One resampled point on the hourly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
  /// Unix seconds at the top of the hour.
  pub hour:   i64,
  /// `%d/%m %H:%M` rendering of `hour` (UTC).
  pub label:  String,
  pub value:  i64,
  /// True when the value differs from the previous point's, and always on
  /// the first point. Front ends use it to emphasise real movement.
  pub marker: bool,
}

/// Resample `history` onto the `hours + 1` hour boundaries ending at the
/// hour containing `now`.
///
/// `now` is an explicit parameter so the same inputs always produce the same
/// series. Empty history produces an empty series; otherwise every boundary
/// gets a value, with empty boundaries borrowing from the nearest bucket by
/// absolute distance. An exact midpoint between two buckets resolves to the
/// earlier one.
pub fn resample(
  history: &[Snapshot],
  metric: Metric,
  hours: u32,
  now: i64,
) -> Vec<SeriesPoint> {
  // Bucket by containing hour; `>=` keeps the newest record per bucket, and
  // among equal timestamps the later row in `history` order.
  let mut buckets: BTreeMap<i64, &Snapshot> = BTreeMap::new();
  for snapshot in history {
    let hour = floor_hour(snapshot.captured_at);
    match buckets.get(&hour) {
      Some(held) if snapshot.captured_at < held.captured_at => {}
      _ => {
        buckets.insert(hour, snapshot);
      }
    }
  }

  let bucketed: Vec<(i64, i64)> = buckets
    .into_iter()
    .map(|(hour, snapshot)| (hour, metric.of(snapshot)))
    .collect();
  let Some((first, rest)) = bucketed.split_first() else {
    return Vec::new();
  };

  let end = floor_hour(now);
  let start = end - i64::from(hours) * SECS_PER_HOUR;

  let mut points = Vec::with_capacity(hours as usize + 1);
  let mut previous = None;
  for step in 0..=i64::from(hours) {
    let hour = start + step * SECS_PER_HOUR;
    let value = nearest(*first, rest, hour);
    points.push(SeriesPoint {
      hour,
      label: hour_label(hour),
      value,
      marker: previous != Some(value),
    });
    previous = Some(value);
  }
  points
}

fn floor_hour(at: i64) -> i64 { at.div_euclid(SECS_PER_HOUR) * SECS_PER_HOUR }

/// The bucket value nearest to `target`. Buckets arrive sorted by hour; the
/// scan stops at the first distance increase, and the strict comparison
/// keeps the first minimum so an exact midpoint resolves to the earlier
/// bucket.
fn nearest(first: (i64, i64), rest: &[(i64, i64)], target: i64) -> i64 {
  let (mut best_distance, mut best) = ((first.0 - target).abs(), first.1);
  for &(hour, value) in rest {
    let distance = (hour - target).abs();
    if distance < best_distance {
      best_distance = distance;
      best = value;
    } else if distance > best_distance {
      break;
    }
  }
  best
}

fn hour_label(hour: i64) -> String {
  match DateTime::from_timestamp(hour, 0) {
    Some(at) => at.format("%d/%m %H:%M").to_string(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn snap(rank: u32, score: i64, captured_at: i64) -> Snapshot {
    Snapshot {
      entity_name: "Player#0001".into(),
      rank,
      score,
      tier_label: "Gold 1".into(),
      tier_index: 9,
      club_tag: None,
      captured_at,
      season: "s7".into(),
    }
  }

  #[test]
  fn empty_history_yields_empty_series() {
    assert!(resample(&[], Metric::Rank, 24, 1_000_000).is_empty());
  }

  #[test]
  fn emits_one_point_per_hour_boundary_inclusive() {
    let history = [snap(10, 5000, 7200)];
    let points = resample(&history, Metric::Rank, 24, 24 * 3600);
    assert_eq!(points.len(), 25);
    assert_eq!(points[0].hour, 0);
    assert_eq!(points[24].hour, 24 * 3600);
  }

  #[test]
  fn same_inputs_produce_the_same_series() {
    let history = [snap(10, 5000, 100), snap(20, 6000, 9000)];
    let a = resample(&history, Metric::Score, 6, 20_000);
    let b = resample(&history, Metric::Score, 6, 20_000);
    assert_eq!(a, b);
  }

  #[test]
  fn empty_boundaries_borrow_from_the_nearest_bucket() {
    // Buckets at hours 0 and 5; hour 2 is nearer to 0, hour 3 nearer to 5.
    let history = [snap(10, 0, 0), snap(20, 0, 5 * 3600)];
    let points = resample(&history, Metric::Rank, 5, 5 * 3600);
    let values: Vec<i64> = points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![10, 10, 10, 20, 20, 20]);
  }

  #[test]
  fn exact_midpoint_resolves_to_the_earlier_bucket() {
    // Buckets at hours 0 and 4; hour 2 is equidistant.
    let history = [snap(10, 0, 0), snap(20, 0, 4 * 3600)];
    let points = resample(&history, Metric::Rank, 4, 4 * 3600);
    assert_eq!(points[2].value, 10);
  }

  #[test]
  fn newest_record_wins_within_a_bucket() {
    let history = [snap(10, 0, 3700), snap(20, 0, 3650)];
    let points = resample(&history, Metric::Rank, 1, 3700);
    assert_eq!(points[1].value, 10);
  }

  #[test]
  fn later_row_wins_a_timestamp_tie_within_a_bucket() {
    let history = [snap(10, 0, 3700), snap(20, 0, 3700)];
    let points = resample(&history, Metric::Rank, 1, 3700);
    assert_eq!(points[1].value, 20);
  }

  #[test]
  fn markers_flag_value_changes_and_the_first_point() {
    let history = [
      snap(10, 0, 0),
      snap(10, 0, 3600),
      snap(10, 0, 2 * 3600),
      snap(20, 0, 3 * 3600),
      snap(20, 0, 4 * 3600),
    ];
    let points = resample(&history, Metric::Rank, 4, 4 * 3600);
    let markers: Vec<bool> = points.iter().map(|p| p.marker).collect();
    assert_eq!(markers, vec![true, false, false, true, false]);
  }

  #[test]
  fn score_metric_reads_the_score_column() {
    let history = [snap(10, 41_000, 0)];
    let points = resample(&history, Metric::Score, 0, 0);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].value, 41_000);
  }

  #[test]
  fn labels_render_day_month_and_hour() {
    // 1970-01-02 03:00 UTC.
    let history = [snap(10, 0, 0)];
    let points = resample(&history, Metric::Rank, 0, 27 * 3600);
    assert_eq!(points[0].label, "02/01 03:00");
  }
}
