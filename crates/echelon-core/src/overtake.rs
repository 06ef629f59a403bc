//! Rank-order inversion detection between two capture instants.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// A single detected overtake: `mover` now out-ranks `overtaken`, who was
/// strictly ahead at the reference instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overtake {
  pub mover:     String,
  pub overtaken: String,
}

/// Find the first rank-order inversion between `reference` (earlier) and
/// `current` (later).
///
/// `current` is scanned in ascending rank order. For each record with a
/// reference entry, the result names the first entity that out-ranked it in
/// `reference` but sits strictly behind it now. Entities missing from either
/// list never participate, and at most one event is reported per call.
pub fn detect(
  current: &[Snapshot],
  reference: &[Snapshot],
) -> Option<Overtake> {
  let reference_ranks: HashMap<&str, u32> = reference
    .iter()
    .map(|s| (s.entity_name.as_str(), s.rank))
    .collect();

  let mut ordered: Vec<&Snapshot> = current.iter().collect();
  ordered.sort_by_key(|s| s.rank);

  for scanned in &ordered {
    let Some(&scanned_before) =
      reference_ranks.get(scanned.entity_name.as_str())
    else {
      continue;
    };
    for other in &ordered {
      let Some(&other_before) =
        reference_ranks.get(other.entity_name.as_str())
      else {
        continue;
      };
      if other_before < scanned_before && other.rank > scanned.rank {
        return Some(Overtake {
          mover:     scanned.entity_name.clone(),
          overtaken: other.entity_name.clone(),
        });
      }
    }
  }
  None
}
