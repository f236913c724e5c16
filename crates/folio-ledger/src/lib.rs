//! FOLIO Ledger - Ownership reconstruction engine
//!
//! Folds a chronological list of extracted transfer events into the
//! current partitioned ownership of a registry folio: fractional
//! bare-ownership stakes plus a disjoint set of usufruct stakes.
//!
//! The pass is strictly ordered — each transition depends on the ledger
//! state left by the previous action — and strictly best-effort: bad
//! input degrades to warnings, never to failure.

pub mod classify;
pub mod engine;
pub mod ledger;
pub mod normalize;
pub mod snapshot;
pub mod transition;

pub use classify::*;
pub use engine::*;
pub use ledger::*;
pub use normalize::*;
pub use snapshot::*;
pub use transition::*;
