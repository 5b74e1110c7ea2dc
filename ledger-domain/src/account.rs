use std::collections::{BTreeMap, BTreeSet};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::scope::AccessScope;
use crate::transaction::AccessTokenId;

/// Opaque, non-empty account name. Names starting with `@` are reserved for
/// the system (`@root`, `@prime-mover`); the domain layer does not enforce
/// that convention, callers that mint new accounts do.
pub type AccountId = String;

/// Everything the ledger knows about one account.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
pub struct AccountData {
    pub balance: i64,
    pub proxy_access: BTreeSet<AccountId>,
    pub privileges: BTreeSet<AccessScope>,
    pub tokens: BTreeMap<AccessTokenId, BTreeSet<AccessScope>>,
}

impl AccountData {
    /// A freshly opened account: zero balance, no proxies, the caller's
    /// default privileges, and a single bootstrap token carrying `Unbounded`
    /// scope on this new account (see DESIGN.md for why the token is not
    /// narrowed to `default_privileges`).
    pub fn opened_with(default_privileges: BTreeSet<AccessScope>, token_id: AccessTokenId) -> Self {
        let mut tokens = BTreeMap::new();
        tokens.insert(token_id, BTreeSet::from([AccessScope::Unbounded]));
        Self {
            balance: 0,
            proxy_access: BTreeSet::new(),
            privileges: default_privileges,
            tokens,
        }
    }

    /// The root account: `Unbounded` privilege, no proxies, no tokens
    /// (a token is minted for it separately at boot if it has none).
    pub fn root() -> Self {
        Self {
            balance: 0,
            proxy_access: BTreeSet::new(),
            privileges: BTreeSet::from([AccessScope::Unbounded]),
            tokens: BTreeMap::new(),
        }
    }
}
