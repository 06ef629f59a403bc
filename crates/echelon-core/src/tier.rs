//! The tier ladder and the rank-to-tier policy.

use serde::{Deserialize, Serialize};

/// A ladder division. `Ord` follows ladder progression, so
/// `Tier::Bronze < Tier::Ruby`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
  Bronze,
  Silver,
  Gold,
  Platinum,
  Diamond,
  Ruby,
}

impl Tier {
  /// Every tier, best first. Role creation walks this order so the most
  /// prestigious roles land highest in a fresh guild's role list.
  pub const LADDER: [Tier; 6] = [
    Tier::Ruby,
    Tier::Diamond,
    Tier::Platinum,
    Tier::Gold,
    Tier::Silver,
    Tier::Bronze,
  ];

  /// The display name, also used verbatim as the guild role name.
  pub fn label(self) -> &'static str {
    match self {
      Self::Bronze => "Bronze",
      Self::Silver => "Silver",
      Self::Gold => "Gold",
      Self::Platinum => "Platinum",
      Self::Diamond => "Diamond",
      Self::Ruby => "Ruby",
    }
  }

  /// Parse a tier from an upstream division label such as `"Gold 2"`.
  /// Only the leading word counts; matching is case-insensitive.
  pub fn from_label(label: &str) -> Option<Self> {
    let head = label.split_whitespace().next()?;
    match head.to_ascii_lowercase().as_str() {
      "bronze" => Some(Self::Bronze),
      "silver" => Some(Self::Silver),
      "gold" => Some(Self::Gold),
      "platinum" => Some(Self::Platinum),
      "diamond" => Some(Self::Diamond),
      "ruby" => Some(Self::Ruby),
      _ => None,
    }
  }
}

/// The tier a snapshot confers.
///
/// Ranks 1 through 500 always map to [`Tier::Ruby`] regardless of the
/// division label; outside that range the label decides. `None` means the
/// snapshot confers nothing (unknown or missing label).
pub fn desired_tier(rank: u32, tier_label: &str) -> Option<Tier> {
  if (1..=500).contains(&rank) {
    return Some(Tier::Ruby);
  }
  Tier::from_label(tier_label)
}
