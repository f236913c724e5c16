//! Diagnostic stream
//!
//! Nothing in the engine is fatal: input comes from a lossy extraction
//! pipeline, so every anomaly degrades to a warning and processing
//! continues. Warnings are collected per run and mirrored to `tracing`.

use std::fmt;

use rust_decimal::Decimal;

/// A single non-fatal anomaly observed during reconstruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// A percentage or date could not be parsed; the value degraded to
    /// "unknown" (for dates, to the sentinel epoch).
    Parse { context: String, detail: String },

    /// An action referenced a holder absent from the expected ledger
    /// state; the entry was skipped.
    Reference { context: String, holder: String },

    /// The final bare-ownership sum deviates from 100% beyond tolerance.
    Conservation { sum: Decimal },

    /// A recognized action category that is not implemented; the action
    /// was skipped.
    Unsupported { label: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Parse { context, detail } => {
                write!(f, "{context}: {detail}")
            }
            Warning::Reference { context, holder } => {
                write!(f, "{context}: '{holder}' is not in the ledger")
            }
            Warning::Conservation { sum } => {
                write!(f, "final ownership sums to {:.2}%, not 100%", sum.round_dp(2))
            }
            Warning::Unsupported { label } => {
                write!(f, "action '{label}' is recognized but not supported")
            }
        }
    }
}

/// Per-run warning collector.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Record a warning, mirroring it to the log.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_accumulate_in_order() {
        let mut diag = Diagnostics::new();
        diag.warn(Warning::Unsupported {
            label: "Cancelamento de Usufruto".to_string(),
        });
        diag.warn(Warning::Conservation {
            sum: Decimal::from(99),
        });

        assert_eq!(diag.len(), 2);
        assert!(matches!(diag.warnings()[0], Warning::Unsupported { .. }));
        assert!(matches!(diag.warnings()[1], Warning::Conservation { .. }));
    }

    #[test]
    fn test_display_is_human_readable() {
        let warning = Warning::Reference {
            context: "transfer agent".to_string(),
            holder: "Maria".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "transfer agent: 'Maria' is not in the ledger"
        );
    }
}
