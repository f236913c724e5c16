//! Ownership transitions
//!
//! One transition per action category over the two ledgers. All of them
//! degrade on bad input: unknown percentages are skipped or defaulted,
//! missing holders are warned about, nothing aborts the run.

use folio_core::{parse_percent, Diagnostics, Party, Warning};
use rust_decimal::Decimal;

use crate::ledger::{Ledger, StakeRecord};

/// Seed an empty bare ledger from the first ownership-transferring action.
///
/// Models the first recorded title event when no prior ownership baseline
/// exists; runs before the action's own transition. Agents are seeded with
/// an equal 100/N split. An action with no agents at all defines the
/// baseline through its beneficiaries instead: the full 100% is spread
/// with the usual distribution rules.
pub fn bootstrap(bare: &mut Ledger, agents: &[Party], beneficiaries: &[Party], diag: &mut Diagnostics) {
    if !bare.is_empty() {
        return;
    }
    if !agents.is_empty() {
        let share = Decimal::ONE_HUNDRED / Decimal::from(agents.len());
        for agent in agents {
            bare.insert(agent.key(), StakeRecord::from_party(agent, share));
        }
        tracing::debug!(agents = agents.len(), "seeded empty ledger from agents");
    } else if !beneficiaries.is_empty() {
        for (beneficiary, amount) in beneficiaries
            .iter()
            .zip(distribute(Decimal::ONE_HUNDRED, beneficiaries, diag))
        {
            bare.credit(beneficiary, amount);
        }
        tracing::debug!(
            beneficiaries = beneficiaries.len(),
            "seeded empty ledger from beneficiaries"
        );
    }
}

/// Sale or donation: debit each agent by the transferred fraction of its
/// current share, then distribute the transferred total to beneficiaries.
pub fn transfer(bare: &mut Ledger, agents: &[Party], beneficiaries: &[Party], diag: &mut Diagnostics) {
    let mut total_transferred = Decimal::ZERO;

    for agent in agents {
        // Unknown transferred percentage: skip, never assume 100%.
        let Some(pct) = transferred_percent(agent, diag) else {
            continue;
        };
        let key = agent.key();
        match bare.get_mut(&key) {
            Some(record) => {
                let amount = record.percentage * pct / Decimal::ONE_HUNDRED;
                record.percentage -= amount;
                total_transferred += amount;
                tracing::debug!(
                    holder = %key,
                    transferred = %amount,
                    remaining = %record.percentage,
                    "debited transfer agent"
                );
            }
            None => diag.warn(Warning::Reference {
                context: "transfer agent".to_string(),
                holder: agent.name.clone(),
            }),
        }
    }

    for (beneficiary, amount) in beneficiaries
        .iter()
        .zip(distribute(total_transferred, beneficiaries, diag))
    {
        bare.credit(beneficiary, amount);
    }
}

/// Death: remove each deceased agent and redistribute their full share to
/// the heirs, weighted by declared received percentage (default 100).
pub fn succession(bare: &mut Ledger, agents: &[Party], beneficiaries: &[Party], diag: &mut Diagnostics) {
    let weights: Vec<Decimal> = beneficiaries
        .iter()
        .map(|heir| received_percent(heir, diag).unwrap_or(Decimal::ONE_HUNDRED))
        .collect();
    let weight_sum: Decimal = weights.iter().copied().sum();

    for agent in agents {
        let key = agent.key();
        let Some(record) = bare.remove(&key) else {
            diag.warn(Warning::Reference {
                context: "deceased owner".to_string(),
                holder: agent.name.clone(),
            });
            continue;
        };
        tracing::debug!(holder = %key, share = %record.percentage, "removed deceased owner");

        if weight_sum <= Decimal::ZERO {
            continue;
        }
        for (heir, weight) in beneficiaries.iter().zip(weights.iter().copied()) {
            bare.credit(heir, record.percentage * weight / weight_sum);
        }
    }
}

/// Partition: pool the full shares of all listed agents, remove them, and
/// distribute the pool with the transfer rule set.
pub fn partition(bare: &mut Ledger, agents: &[Party], beneficiaries: &[Party], diag: &mut Diagnostics) {
    let mut pool = Decimal::ZERO;

    for agent in agents {
        let key = agent.key();
        match bare.remove(&key) {
            Some(record) => {
                pool += record.percentage;
                tracing::debug!(holder = %key, share = %record.percentage, "pooled partition share");
            }
            None => diag.warn(Warning::Reference {
                context: "partition agent".to_string(),
                holder: agent.name.clone(),
            }),
        }
    }

    for (beneficiary, amount) in beneficiaries
        .iter()
        .zip(distribute(pool, beneficiaries, diag))
    {
        bare.credit(beneficiary, amount);
    }
}

/// Usufruct grant: credits the separate usufruct ledger only. Bare
/// ownership is untouched; default weight is 100% when unspecified.
pub fn grant_usufruct(usufruct: &mut Ledger, beneficiaries: &[Party], diag: &mut Diagnostics) {
    for beneficiary in beneficiaries {
        let pct = received_percent(beneficiary, diag).unwrap_or(Decimal::ONE_HUNDRED);
        usufruct.credit(beneficiary, pct);
        tracing::debug!(holder = %beneficiary.key(), granted = %pct, "credited usufruct");
    }
}

/// Usufruct cancellation is recognized but intentionally not implemented;
/// the action is reported and skipped.
pub fn cancel_usufruct(label: &str, diag: &mut Diagnostics) {
    diag.warn(Warning::Unsupported {
        label: label.to_string(),
    });
}

/// Civil-status change: attach spouse data without touching percentages.
/// An already-present spouse is never overwritten; unknown holders get a
/// zero-percent record carrying the spouse.
pub fn civil_status(bare: &mut Ledger, agents: &[Party]) {
    for agent in agents {
        let key = agent.key();
        match bare.get_mut(&key) {
            Some(record) => {
                if record.spouse.is_none() {
                    record.spouse = agent.spouse.clone();
                }
            }
            None => {
                bare.insert(key, StakeRecord::from_party(agent, Decimal::ZERO));
            }
        }
    }
}

/// Distribute `pool` percentage points across beneficiaries.
///
/// Declared received percentages are absolute points:
/// - nobody declares: equal split of the pool
/// - declared sum exceeds the pool: declared values rescaled down to fit,
///   undeclared beneficiaries get nothing
/// - some undeclared: they equally absorb the remainder
/// - all declared but short of the pool: the shortfall is spread
///   proportionally to the declared shares
///
/// Credits always sum to the pool (when the pool is distributable).
fn distribute(pool: Decimal, beneficiaries: &[Party], diag: &mut Diagnostics) -> Vec<Decimal> {
    if beneficiaries.is_empty() {
        if pool > Decimal::ZERO {
            tracing::warn!(pool = %pool, "transferred share has no beneficiaries and is lost");
        }
        return Vec::new();
    }

    let declared: Vec<Option<Decimal>> = beneficiaries
        .iter()
        .map(|beneficiary| received_percent(beneficiary, diag))
        .collect();

    if declared.iter().all(Option::is_none) {
        let share = pool / Decimal::from(beneficiaries.len());
        return vec![share; beneficiaries.len()];
    }

    let declared_sum: Decimal = declared.iter().flatten().copied().sum();
    let undeclared = declared.iter().filter(|value| value.is_none()).count();

    if declared_sum > pool {
        return declared
            .iter()
            .map(|value| match value {
                Some(points) => *points * pool / declared_sum,
                None => Decimal::ZERO,
            })
            .collect();
    }

    let remainder = pool - declared_sum;
    if undeclared > 0 {
        let each = remainder / Decimal::from(undeclared);
        return declared.iter().map(|value| value.unwrap_or(each)).collect();
    }

    if remainder > Decimal::ZERO && declared_sum > Decimal::ZERO {
        return declared
            .iter()
            .map(|value| {
                let points = value.unwrap_or(Decimal::ZERO);
                points + remainder * points / declared_sum
            })
            .collect();
    }

    declared
        .iter()
        .map(|value| value.unwrap_or(Decimal::ZERO))
        .collect()
}

/// Transferred percentage of an agent; `None` (with a warning) when the
/// value is unspecified or malformed.
fn transferred_percent(agent: &Party, diag: &mut Diagnostics) -> Option<Decimal> {
    match agent.percentage_transferred.as_ref().map(parse_percent) {
        Some(Ok(Some(points))) => Some(points),
        Some(Ok(None)) | None => {
            diag.warn(Warning::Parse {
                context: format!("transferred percentage of '{}'", agent.name),
                detail: "not informed; transfer skipped".to_string(),
            });
            None
        }
        Some(Err(error)) => {
            diag.warn(Warning::Parse {
                context: format!("transferred percentage of '{}'", agent.name),
                detail: error.to_string(),
            });
            None
        }
    }
}

/// Received percentage of a beneficiary; `None` when undeclared (which is
/// normal), with a warning only for malformed values.
fn received_percent(beneficiary: &Party, diag: &mut Diagnostics) -> Option<Decimal> {
    match beneficiary.percentage_received.as_ref().map(parse_percent) {
        Some(Ok(points)) => points,
        Some(Err(error)) => {
            diag.warn(Warning::Parse {
                context: format!("received percentage of '{}'", beneficiary.name),
                detail: error.to_string(),
            });
            None
        }
        None => None,
    }
}
