//! Ownership ledger
//!
//! Two instances exist per reconstruction run: bare ownership and
//! usufruct. A ledger is a keyed map of stake records mutated in place by
//! one transition per action. Keys are ordered so iteration — and with it
//! the final snapshot — is deterministic.

use std::collections::BTreeMap;

use folio_core::{HolderKey, Party, Spouse};
use rust_decimal::Decimal;

/// Current stake of one holder.
#[derive(Clone, Debug, PartialEq)]
pub struct StakeRecord {
    pub name: String,
    pub tax_id: Option<String>,
    /// Percentage points; never negative.
    pub percentage: Decimal,
    pub spouse: Option<Spouse>,
}

impl StakeRecord {
    /// Build a record for a party with an initial stake.
    pub fn from_party(party: &Party, percentage: Decimal) -> Self {
        StakeRecord {
            name: party.name.clone(),
            tax_id: party.tax_id.clone(),
            percentage,
            spouse: party.spouse.clone(),
        }
    }
}

/// Keyed mapping from holder to current stake.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    records: BTreeMap<HolderKey, StakeRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn get(&self, key: &HolderKey) -> Option<&StakeRecord> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &HolderKey) -> Option<&mut StakeRecord> {
        self.records.get_mut(key)
    }

    pub fn contains(&self, key: &HolderKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn insert(&mut self, key: HolderKey, record: StakeRecord) {
        self.records.insert(key, record);
    }

    pub fn remove(&mut self, key: &HolderKey) -> Option<StakeRecord> {
        self.records.remove(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HolderKey, &StakeRecord)> {
        self.records.iter()
    }

    /// Credit a party, creating the record if absent. The spouse of an
    /// existing record is left alone.
    pub fn credit(&mut self, party: &Party, amount: Decimal) {
        let key = party.key();
        match self.records.get_mut(&key) {
            Some(record) => record.percentage += amount,
            None => {
                self.records.insert(key, StakeRecord::from_party(party, amount));
            }
        }
    }

    /// Sum of all stakes, in percentage points.
    pub fn total(&self) -> Decimal {
        self.records.values().map(|record| record.percentage).sum()
    }

    /// Drop records below `epsilon` — holders treated as fully divested.
    pub fn prune(&mut self, epsilon: Decimal) {
        self.records.retain(|_, record| record.percentage >= epsilon);
    }
}
