use std::sync::Mutex;

use ledger_domain::Transaction;

use crate::TransactionStore;

/// In-memory transaction store for tests, avoiding a `sled` temp-dir per
/// test.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    transactions: Mutex<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn append(&self, transaction: &Transaction) -> anyhow::Result<()> {
        self.transactions.lock().unwrap().push(transaction.clone());
        Ok(())
    }

    fn scan(&self) -> anyhow::Result<Vec<Transaction>> {
        Ok(self.transactions.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_domain::{AccountAction, TransactionAuthorization};

    fn tx(id: u64, performed_at: u128) -> Transaction {
        Transaction {
            id,
            performed_at,
            account: "@root".to_string(),
            authorization: TransactionAuthorization::SelfAuthorized,
            access_token: None,
            action: AccountAction::QueryBalance,
        }
    }

    #[test]
    fn scan_preserves_insertion_order() {
        let store = InMemoryTransactionStore::new();
        store.append(&tx(1, 10)).unwrap();
        store.append(&tx(2, 20)).unwrap();
        store.append(&tx(3, 5)).unwrap();
        let ids: Vec<u64> = store.scan().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
