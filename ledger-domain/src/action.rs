use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::account::AccountId;
use crate::scope::AccessScope;
use crate::transaction::{AccessTokenId, CurrencyAmount};

/// The action a transaction asks the processor to perform against
/// `TransactionRequest::account`. JSON (de)serialization follows the
/// `{"Case": "...", "Fields": [...]}` tagged-variant convention -- see
/// `wire.rs`.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub enum AccountAction {
    Transfer { amount: CurrencyAmount, destination: AccountId },
    Mint { amount: CurrencyAmount },
    QueryBalance,
    QueryPrivileges,
    QueryHistory { since: u128 },
    OpenAccount { new_id: AccountId, initial_token_id: AccessTokenId },
    CreateToken { token_id: AccessTokenId, scopes: BTreeSet<AccessScope> },
    AddPrivileges { target: AccountId, scopes: BTreeSet<AccessScope> },
    RemovePrivileges { target: AccountId, scopes: BTreeSet<AccessScope> },
}

impl AccountAction {
    /// True for actions that never mutate state (`QueryBalance`,
    /// `QueryPrivileges`, `QueryHistory`). Drives both the envelope's lock
    /// discipline (C6) and the ledger's append-or-skip decision (C4).
    pub fn is_pure_query(&self) -> bool {
        matches!(
            self,
            AccountAction::QueryBalance | AccountAction::QueryPrivileges | AccountAction::QueryHistory { .. }
        )
    }
}

/// Rejects non-positive amounts on `Mint`/`Transfer` before authentication
/// runs, so the error is visible even to unprivileged callers.
pub fn validate_action(action: &AccountAction) -> Result<(), crate::error::TransactionError> {
    let amount = match action {
        AccountAction::Mint { amount } => Some(*amount),
        AccountAction::Transfer { amount, .. } => Some(*amount),
        _ => None,
    };
    if let Some(amount) = amount {
        if amount <= 0 {
            return Err(crate::error::TransactionError::InvalidAmount);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransactionError;

    #[test]
    fn rejects_non_positive_mint() {
        assert_eq!(
            validate_action(&AccountAction::Mint { amount: 0 }),
            Err(TransactionError::InvalidAmount)
        );
        assert_eq!(
            validate_action(&AccountAction::Mint { amount: -1 }),
            Err(TransactionError::InvalidAmount)
        );
    }

    #[test]
    fn accepts_positive_transfer() {
        assert!(validate_action(&AccountAction::Transfer { amount: 5, destination: "x".into() }).is_ok());
    }

    #[test]
    fn query_actions_are_pure() {
        assert!(AccountAction::QueryBalance.is_pure_query());
        assert!(AccountAction::QueryPrivileges.is_pure_query());
        assert!(AccountAction::QueryHistory { since: 0 }.is_pure_query());
        assert!(!AccountAction::Mint { amount: 1 }.is_pure_query());
    }
}
