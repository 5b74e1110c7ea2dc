use borsh::{to_vec, BorshDeserialize};
use ledger_domain::Transaction;
use log::trace;
use sled::Db;

use crate::TransactionStore;

/// `sled`-backed transaction store. Transactions are keyed by the
/// big-endian bytes of their `TransactionId`, which both gives `sled`'s
/// natural key ordering a meaning (oldest first) and makes `scan` a plain
/// ordered iteration over the tree.
#[derive(Clone)]
pub struct SledTransactionStore {
    db: Db,
}

impl SledTransactionStore {
    /// Opens (or creates) the store at `path`. A missing path is not an
    /// error -- `sled::open` creates the tree on first use, which matches
    /// "missing store at startup is treated as empty ledger".
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// An ephemeral store that never touches disk, for tests.
    pub fn temporary() -> anyhow::Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }
}

impl TransactionStore for SledTransactionStore {
    fn append(&self, transaction: &Transaction) -> anyhow::Result<()> {
        let key = transaction.id.to_be_bytes();
        let value = to_vec(transaction)?;
        self.db.insert(key, value)?;
        trace!("appended transaction {} to ledger", transaction.id);
        Ok(())
    }

    fn scan(&self) -> anyhow::Result<Vec<Transaction>> {
        let mut out = Vec::new();
        for entry in self.db.iter() {
            let (_, value) = entry?;
            out.push(Transaction::try_from_slice(&value)?);
        }
        Ok(out)
    }
}
