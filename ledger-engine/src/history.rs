use ledger_domain::{AccountAction, Transaction, TransactionError, TransactionResult};
use ledger_store::TransactionStore;

use crate::processor;
use crate::state::ProcessorState;

/// Wraps the in-memory processor (C3) with durable logging and history
/// queries (C4). `apply` delegates to the inner processor first: on success
/// for a non-query action the transaction is appended to the store; on
/// `ActionNotImplemented` for `QueryHistory` this layer answers the query
/// itself by scanning the store. Any other error propagates unchanged.
pub struct HistoryProcessor<'s, S: TransactionStore> {
    store: &'s S,
}

impl<'s, S: TransactionStore> HistoryProcessor<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    pub fn apply(
        &self,
        transaction: &Transaction,
        state: &ProcessorState,
    ) -> Result<(ProcessorState, TransactionResult), TransactionError> {
        match processor::apply(transaction, state) {
            Ok((next, result)) => {
                if !transaction.action.is_pure_query() {
                    self.store.append(transaction).map_err(|_| TransactionError::Unauthorized)?;
                }
                Ok((next, result))
            }
            Err(TransactionError::ActionNotImplemented) => self.query_history(transaction, state),
            Err(other) => Err(other),
        }
    }

    fn query_history(
        &self,
        transaction: &Transaction,
        state: &ProcessorState,
    ) -> Result<(ProcessorState, TransactionResult), TransactionError> {
        let AccountAction::QueryHistory { since } = &transaction.action else {
            return Err(TransactionError::ActionNotImplemented);
        };
        let caller = &transaction.account;
        let mut matches: Vec<Transaction> = self
            .store
            .scan()
            .map_err(|_| TransactionError::Unauthorized)?
            .into_iter()
            .filter(|t| t.performed_at >= *since)
            .filter(|t| {
                &t.account == caller
                    || matches!(&t.action, AccountAction::Transfer { destination, .. } if destination == caller)
            })
            .collect();
        matches.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
        Ok((state.clone(), TransactionResult::History { history: matches }))
    }

    /// Folds every stored transaction through the inner processor in order,
    /// silently dropping any that error. Used at boot to rebuild state from
    /// the ledger. Total by construction in the happy path, since the store
    /// only ever receives transactions the inner processor already accepted
    /// (see DESIGN.md).
    pub fn replay(&self, mut state: ProcessorState) -> anyhow::Result<ProcessorState> {
        for transaction in self.store.scan()? {
            if let Ok((next, _)) = processor::apply(&transaction, &state) {
                state = next;
            }
        }
        Ok(state)
    }
}
