//! Tier-role reconciliation.
//!
//! Keeps guild roles in line with the ladder: every registered member
//! holds exactly the role for their current tier and none of the other
//! tracked tier roles. The [`Reconciler`] is generic over the gateway
//! and store traits from `echelon-core`, so tests drive it with fakes
//! and the daemon wires in the real REST gateway and SQLite store.

mod reconciler;

pub mod error;

pub use self::{
  error::{Error, Result},
  reconciler::{MemberOutcome, Reconciler, SweepReport},
};
