//! Final snapshot and validation
//!
//! Finalization renders the two ledgers into the read-only output
//! contract: formatted percentages, spouse normalized to an object, and
//! the conservation check on the bare-ownership sum.

use folio_core::{Diagnostics, Spouse, Warning};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::ledger::{Ledger, StakeRecord};

/// How final percentages are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatMode {
    /// Two-decimal formatting of the accumulated values.
    #[default]
    Raw,
    /// Proportional rescale so the bare-ownership sum is exactly 100%,
    /// applied only when the un-rescaled sum deviates.
    Normalized,
}

/// One holder in the final output.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub name: String,
    pub tax_id: Option<String>,
    /// Rendered as `"NN.NN%"`.
    pub percentage: String,
    #[serde(serialize_with = "spouse_or_empty")]
    pub spouse: Option<Spouse>,
}

/// Read-only result of one reconstruction run.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub registration_id: Option<String>,
    pub property_name: Option<String>,
    pub current_owners: Vec<Holding>,
    pub usufruct_holders: Vec<Holding>,
}

/// Format the bare-ownership ledger, checking conservation.
pub fn finalize_owners(
    bare: &Ledger,
    mode: FormatMode,
    tolerance: Decimal,
    diag: &mut Diagnostics,
) -> Vec<Holding> {
    let sum = bare.total();
    if (sum - Decimal::ONE_HUNDRED).abs() > tolerance {
        diag.warn(Warning::Conservation { sum });
    }

    let rescale = mode == FormatMode::Normalized && sum > Decimal::ZERO && sum != Decimal::ONE_HUNDRED;
    bare.iter()
        .map(|(_, record)| {
            let value = if rescale {
                record.percentage * Decimal::ONE_HUNDRED / sum
            } else {
                record.percentage
            };
            holding(record, value)
        })
        .collect()
}

/// Format the usufruct ledger, excluding holders who are also current
/// bare owners. The exclusion mirrors the upstream system; its rationale
/// is unrecorded (see DESIGN.md).
pub fn finalize_usufruct(usufruct: &Ledger, bare: &Ledger) -> Vec<Holding> {
    usufruct
        .iter()
        .filter(|(key, _)| !bare.contains(key))
        .map(|(_, record)| holding(record, record.percentage))
        .collect()
}

fn holding(record: &StakeRecord, value: Decimal) -> Holding {
    Holding {
        name: record.name.clone(),
        tax_id: record.tax_id.clone(),
        percentage: format!("{:.2}%", value.round_dp(2)),
        spouse: record.spouse.clone(),
    }
}

/// Serialize an absent spouse as `{}` rather than `null`.
fn spouse_or_empty<S>(spouse: &Option<Spouse>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match spouse {
        Some(spouse) => spouse.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[cfg(test)]
mod tests {
    use folio_core::Party;

    use super::*;

    fn ledger_with(stakes: &[(&str, &str)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (name, points) in stakes {
            let party = Party {
                name: name.to_string(),
                ..Party::default()
            };
            ledger.credit(&party, points.parse().unwrap());
        }
        ledger
    }

    fn tolerance() -> Decimal {
        Decimal::new(1, 1)
    }

    #[test]
    fn test_raw_mode_formats_two_decimals() {
        let bare = ledger_with(&[("A", "33.333"), ("B", "66.667")]);
        let mut diag = Diagnostics::new();

        let owners = finalize_owners(&bare, FormatMode::Raw, tolerance(), &mut diag);

        assert_eq!(owners[0].percentage, "33.33%");
        assert_eq!(owners[1].percentage, "66.67%");
        assert!(diag.is_empty());
    }

    #[test]
    fn test_conservation_warning_beyond_tolerance() {
        let bare = ledger_with(&[("A", "60"), ("B", "30")]);
        let mut diag = Diagnostics::new();

        finalize_owners(&bare, FormatMode::Raw, tolerance(), &mut diag);

        assert_eq!(diag.len(), 1);
        assert!(matches!(
            diag.warnings()[0],
            Warning::Conservation { sum } if sum == Decimal::from(90)
        ));
    }

    #[test]
    fn test_within_tolerance_is_silent() {
        let bare = ledger_with(&[("A", "99.95")]);
        let mut diag = Diagnostics::new();
        finalize_owners(&bare, FormatMode::Raw, tolerance(), &mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_normalized_mode_rescales_to_100() {
        let bare = ledger_with(&[("A", "40"), ("B", "40")]);
        let mut diag = Diagnostics::new();

        let owners = finalize_owners(&bare, FormatMode::Normalized, tolerance(), &mut diag);

        assert_eq!(owners[0].percentage, "50.00%");
        assert_eq!(owners[1].percentage, "50.00%");
        // The warning reports the pre-rescale sum.
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_usufruct_excludes_current_bare_owners() {
        let bare = ledger_with(&[("A", "100")]);
        let usufruct = ledger_with(&[("A", "100"), ("U", "50")]);

        let holders = finalize_usufruct(&usufruct, &bare);

        assert_eq!(holders.len(), 1);
        assert_eq!(holders[0].name, "U");
        assert_eq!(holders[0].percentage, "50.00%");
    }

    #[test]
    fn test_absent_spouse_serializes_as_empty_object() {
        let bare = ledger_with(&[("A", "100")]);
        let mut diag = Diagnostics::new();
        let owners = finalize_owners(&bare, FormatMode::Raw, tolerance(), &mut diag);

        let json = serde_json::to_value(&owners[0]).unwrap();
        assert_eq!(json["spouse"], serde_json::json!({}));
        assert_eq!(json["percentage"], "100.00%");
    }
}
