//! Reconstruction engine
//!
//! One synchronous, in-memory pass: normalize the action list, fold each
//! action through its transition in chronological order, prune divested
//! holders, then render the final snapshot. Each invocation owns its two
//! ledgers; there is no shared state between runs.

use folio_core::{ActionRecord, Diagnostics, RegistryExtract};
use rust_decimal::Decimal;

use crate::classify::{classify, ActionKind};
use crate::ledger::Ledger;
use crate::normalize::normalize_actions;
use crate::snapshot::{finalize_owners, finalize_usufruct, FormatMode, Snapshot};
use crate::transition;

/// Tuning knobs for one reconstruction run.
#[derive(Clone, Debug)]
pub struct ReconstructOptions {
    /// Final percentage rendering mode.
    pub mode: FormatMode,
    /// Stakes below this are treated as fully divested and pruned.
    pub prune_epsilon: Decimal,
    /// Allowed deviation of the final bare sum from 100%.
    pub conservation_tolerance: Decimal,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        ReconstructOptions {
            mode: FormatMode::Raw,
            prune_epsilon: Decimal::new(1, 4),
            conservation_tolerance: Decimal::new(1, 1),
        }
    }
}

/// Snapshot plus the warnings the run produced.
#[derive(Debug)]
pub struct Reconstruction {
    pub snapshot: Snapshot,
    pub diagnostics: Diagnostics,
}

/// Reconstruct current ownership from an extraction document.
pub fn reconstruct(extract: RegistryExtract, options: &ReconstructOptions) -> Reconstruction {
    let mut diag = Diagnostics::new();
    let actions = normalize_actions(extract.actions, &mut diag);
    tracing::debug!(actions = actions.len(), "starting reconstruction");

    let mut bare = Ledger::new();
    let mut usufruct = Ledger::new();

    for action in &actions {
        apply(&mut bare, &mut usufruct, action, options, &mut diag);
    }

    let current_owners = finalize_owners(&bare, options.mode, options.conservation_tolerance, &mut diag);
    let usufruct_holders = finalize_usufruct(&usufruct, &bare);

    Reconstruction {
        snapshot: Snapshot {
            registration_id: extract.registration_id,
            property_name: extract.property_name,
            current_owners,
            usufruct_holders,
        },
        diagnostics: diag,
    }
}

/// Apply one normalized action to the ledgers.
fn apply(
    bare: &mut Ledger,
    usufruct: &mut Ledger,
    action: &ActionRecord,
    options: &ReconstructOptions,
    diag: &mut Diagnostics,
) {
    let kind = classify(&action.label);
    tracing::debug!(date = %action.date, label = %action.label, ?kind, "applying action");

    if kind.transfers_ownership() {
        transition::bootstrap(bare, &action.agents, &action.beneficiaries, diag);
    }

    match kind {
        ActionKind::Sale => {
            transition::transfer(bare, &action.agents, &action.beneficiaries, diag);
        }
        ActionKind::Donation => {
            transition::transfer(bare, &action.agents, &action.beneficiaries, diag);
            if reserves_usufruct(action) {
                transition::grant_usufruct(usufruct, &action.beneficiaries, diag);
            }
        }
        ActionKind::Death => {
            transition::succession(bare, &action.agents, &action.beneficiaries, diag);
        }
        ActionKind::Partition => {
            transition::partition(bare, &action.agents, &action.beneficiaries, diag);
        }
        ActionKind::UsufructGrant => {
            transition::grant_usufruct(usufruct, &action.beneficiaries, diag);
        }
        ActionKind::UsufructCancellation => transition::cancel_usufruct(&action.label, diag),
        ActionKind::CivilStatus => transition::civil_status(bare, &action.agents),
        ActionKind::NameChange | ActionKind::Unclassified => {
            tracing::debug!(label = %action.label, "no-op action skipped");
        }
    }

    bare.prune(options.prune_epsilon);
}

/// Donation deeds can reserve usufruct in the same act, either in the
/// label itself or in the free-text notes.
fn reserves_usufruct(action: &ActionRecord) -> bool {
    let label = action.label.to_lowercase();
    label.contains("usufru")
        || action
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains("reserva"))
}
