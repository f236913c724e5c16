//! Action classification
//!
//! The extractor's type labels are free text. Classification maps a
//! label onto a closed set of transition categories by case-insensitive
//! substring match, keeping the permissiveness of the upstream
//! vocabulary while making the action space exhaustively testable.

/// Transition category of one action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Civil-status change carrying spouse data; attaches the spouse.
    CivilStatus,
    /// Pure rename or marriage announcement; both ledgers untouched.
    NameChange,
    /// Sale of (part of) a bare-ownership stake.
    Sale,
    /// Donation; may additionally reserve usufruct in the same deed.
    Donation,
    /// Death of an owner, with succession to the listed heirs.
    Death,
    /// Estate partition among the listed parties.
    Partition,
    /// Usufruct grant, credited to the separate usufruct ledger.
    UsufructGrant,
    /// Usufruct cancellation; recognized but intentionally unimplemented.
    UsufructCancellation,
    /// Anything else; both ledgers untouched.
    Unclassified,
}

impl ActionKind {
    /// Categories that leave both ledgers untouched.
    pub fn is_noop(self) -> bool {
        matches!(self, ActionKind::NameChange | ActionKind::Unclassified)
    }

    /// Categories that move bare ownership between holders, and therefore
    /// warrant bootstrapping an empty ledger from the listed agents.
    pub fn transfers_ownership(self) -> bool {
        matches!(
            self,
            ActionKind::Sale | ActionKind::Donation | ActionKind::Death | ActionKind::Partition
        )
    }
}

/// Classify a free-text action label.
///
/// Cancellation is tested before the plain usufruct pattern, which would
/// otherwise shadow it.
pub fn classify(label: &str) -> ActionKind {
    let label = label.to_lowercase();
    let has = |needle: &str| label.contains(needle);

    if has("estado civil") || has("civil status") {
        ActionKind::CivilStatus
    } else if has("alteração nome")
        || has("alteração de nome")
        || has("alteracao nome")
        || has("alteracao de nome")
        || has("name change")
        || has("casamento")
        || has("marriage")
    {
        ActionKind::NameChange
    } else if has("usufru") && (has("cancel") || has("extin")) {
        ActionKind::UsufructCancellation
    } else if has("venda") || has("sale") {
        ActionKind::Sale
    } else if has("doação") || has("doacao") || has("donation") {
        ActionKind::Donation
    } else if has("óbito") || has("obito") || has("falecimento") || has("death") {
        ActionKind::Death
    } else if has("partilha") || has("partition") || has("share") {
        ActionKind::Partition
    } else if has("usufru") {
        ActionKind::UsufructGrant
    } else {
        ActionKind::Unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary() {
        let cases = [
            ("Venda", ActionKind::Sale),
            ("venda nua propriedade", ActionKind::Sale),
            ("SALE", ActionKind::Sale),
            ("Doação", ActionKind::Donation),
            ("doacao", ActionKind::Donation),
            ("Óbito", ActionKind::Death),
            ("falecimento do titular", ActionKind::Death),
            ("Partilha", ActionKind::Partition),
            ("share transfer", ActionKind::Partition),
            ("Instituição de Usufruto", ActionKind::UsufructGrant),
            ("usufruct grant", ActionKind::UsufructGrant),
            ("Alteração do estado civil e nome", ActionKind::CivilStatus),
            ("Casamento", ActionKind::NameChange),
            ("Alteração de Nome do Imóvel", ActionKind::NameChange),
            ("Instituição de Servidão", ActionKind::Unclassified),
            ("", ActionKind::Unclassified),
        ];
        for (label, expected) in cases {
            assert_eq!(classify(label), expected, "label: {label:?}");
        }
    }

    #[test]
    fn test_cancellation_is_not_shadowed_by_grant() {
        assert_eq!(
            classify("Cancelamento de Usufruto"),
            ActionKind::UsufructCancellation
        );
        assert_eq!(
            classify("Extinção de Usufruto"),
            ActionKind::UsufructCancellation
        );
        assert_eq!(
            classify("usufruct cancellation"),
            ActionKind::UsufructCancellation
        );
    }

    #[test]
    fn test_noop_categories() {
        assert!(ActionKind::NameChange.is_noop());
        assert!(ActionKind::Unclassified.is_noop());
        assert!(!ActionKind::Sale.is_noop());
        assert!(!ActionKind::UsufructCancellation.is_noop());
    }

    #[test]
    fn test_ownership_transfer_categories() {
        assert!(ActionKind::Sale.transfers_ownership());
        assert!(ActionKind::Donation.transfers_ownership());
        assert!(ActionKind::Death.transfers_ownership());
        assert!(ActionKind::Partition.transfers_ownership());
        assert!(!ActionKind::UsufructGrant.transfers_ownership());
        assert!(!ActionKind::CivilStatus.transfers_ownership());
    }
}
