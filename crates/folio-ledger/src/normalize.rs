//! Action normalization
//!
//! The extractor may report the same event twice (overlapping text
//! chunks) and dates in whatever format the source document used.
//! Normalization dedups, parses dates against the known formats, sorts
//! chronologically and rewrites every date to the canonical form.

use std::collections::HashSet;

use chrono::NaiveDate;
use folio_core::{ActionRecord, Diagnostics, Warning};

/// Date formats seen in registry extracts, in match order.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%m/%d/%Y", "%Y-%m-%d", "%d%m%Y", "%Y/%m/%d"];

/// Canonical form action dates are rewritten to.
const CANONICAL_FORMAT: &str = "%d/%m/%Y";

/// Substituted when no format matches, so the action still sorts.
pub fn fallback_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
}

/// Parse a date against the known formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn parse_date_or_fallback(raw: &str, diag: &mut Diagnostics) -> NaiveDate {
    parse_date(raw).unwrap_or_else(|| {
        diag.warn(Warning::Parse {
            context: "action date".to_string(),
            detail: format!("unknown format {raw:?}, substituting 01/01/1900"),
        });
        fallback_date()
    })
}

/// Lower-cased type label, the secondary sort key.
fn label_key(action: &ActionRecord) -> String {
    action.label.trim().to_lowercase()
}

/// Identity of an action for deduplication: label, raw date and the
/// sorted participant names. Only the first occurrence is kept.
fn dedup_key(action: &ActionRecord) -> (String, String, Vec<String>, Vec<String>) {
    let mut agents: Vec<String> = action.agents.iter().map(|p| p.name.clone()).collect();
    agents.sort();
    let mut beneficiaries: Vec<String> = action
        .beneficiaries
        .iter()
        .map(|p| p.name.clone())
        .collect();
    beneficiaries.sort();
    (label_key(action), action.date.clone(), agents, beneficiaries)
}

/// Dedup, date-canonicalize and chronologically sort an action list.
///
/// Normalizing already-normalized output is a no-op.
pub fn normalize_actions(actions: Vec<ActionRecord>, diag: &mut Diagnostics) -> Vec<ActionRecord> {
    let mut seen = HashSet::new();
    let mut unique: Vec<(NaiveDate, ActionRecord)> = Vec::new();

    for mut action in actions {
        if !seen.insert(dedup_key(&action)) {
            tracing::debug!(date = %action.date, label = %action.label, "dropping duplicate action");
            continue;
        }
        let date = parse_date_or_fallback(&action.date, diag);
        action.date = date.format(CANONICAL_FORMAT).to_string();
        unique.push((date, action));
    }

    unique.sort_by(|(date_a, a), (date_b, b)| {
        date_a.cmp(date_b).then_with(|| label_key(a).cmp(&label_key(b)))
    });
    unique.into_iter().map(|(_, action)| action).collect()
}
