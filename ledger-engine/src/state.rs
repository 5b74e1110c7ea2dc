use std::collections::{BTreeMap, BTreeSet};

use ledger_domain::{AccessScope, AccountData, AccountId};

/// The whole mutable world the in-memory processor operates over. Every
/// mutation is expressed as a functional update that returns a new
/// `ProcessorState`; the processor itself holds no mutable state, so the
/// service envelope can swap the new value in atomically under its write
/// lock.
#[derive(Debug, Clone)]
pub struct ProcessorState {
    pub accounts: BTreeMap<AccountId, AccountData>,
    pub default_privileges: BTreeSet<AccessScope>,
}

impl ProcessorState {
    /// No accounts, the canonical default privilege set for newly opened
    /// accounts.
    pub fn empty() -> Self {
        Self {
            accounts: BTreeMap::new(),
            default_privileges: BTreeSet::from([
                AccessScope::QueryBalance,
                AccessScope::QueryHistory,
                AccessScope::QueryPrivileges,
                AccessScope::Transfer,
            ]),
        }
    }

    /// Seeds `@root` with the `Unbounded` privilege if it is not already
    /// present. Called once at boot, before ledger replay.
    pub fn with_root_seeded(mut self, root_id: &str) -> Self {
        self.accounts.entry(root_id.to_string()).or_insert_with(AccountData::root);
        self
    }
}
