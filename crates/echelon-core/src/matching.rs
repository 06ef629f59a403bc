//! Search-fragment disambiguation against candidate rows.
//!
//! Entity names carry a `#tag` suffix (`"Alice#1234"`); users type fragments
//! with or without it. The policy here decides which candidate a fragment
//! meant when several match.

use crate::snapshot::Snapshot;

/// Minimum fragment length the query layer accepts.
pub const MIN_QUERY_LEN: usize = 3;

/// The name with any `#tag` suffix stripped.
fn base_name(name: &str) -> &str {
  name.split('#').next().unwrap_or(name)
}

/// Pick the best candidate for a user-typed fragment.
///
/// Rules, in order: exact match on the full name; exact match on the
/// pre-`#` portion; prefix match on the full name; prefix match on the
/// pre-`#` portion; first candidate. All comparisons are case-insensitive.
/// `None` only when `candidates` is empty.
pub fn best_match<'a>(
  fragment: &str,
  candidates: &'a [Snapshot],
) -> Option<&'a Snapshot> {
  let fragment = fragment.to_lowercase();
  candidates
    .iter()
    .find(|s| s.entity_name.to_lowercase() == fragment)
    .or_else(|| {
      candidates
        .iter()
        .find(|s| base_name(&s.entity_name).to_lowercase() == fragment)
    })
    .or_else(|| {
      candidates
        .iter()
        .find(|s| s.entity_name.to_lowercase().starts_with(&fragment))
    })
    .or_else(|| {
      candidates
        .iter()
        .find(|s| base_name(&s.entity_name).to_lowercase().starts_with(&fragment))
    })
    .or_else(|| candidates.first())
}
