//! Durable storage for applied transactions. Generalizes a keyed-record
//! store abstraction into an append-only, order-preserving log: the only
//! operations a backend needs to support are `append` and an ordered `scan`.

pub mod memory;
pub mod sled_store;

use ledger_domain::Transaction;

/// An append-only, insertion-ordered log of applied (non-query)
/// transactions. Implementations must preserve insertion order on `scan`;
/// under normal operation that order coincides with `TransactionId` order
/// since ids are assigned before the write lock that guards `append` is
/// released (see `ledger-api`'s service envelope).
pub trait TransactionStore {
    fn append(&self, transaction: &Transaction) -> anyhow::Result<()>;

    /// All stored transactions, oldest first.
    fn scan(&self) -> anyhow::Result<Vec<Transaction>>;
}

pub use memory::InMemoryTransactionStore;
pub use sled_store::SledTransactionStore;
