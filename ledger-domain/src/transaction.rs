use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::action::AccountAction;
use crate::authorization::TransactionAuthorization;
use crate::scope::AccessScope;

/// Opaque access-token identifier (canonically 40 random bytes, base64
/// encoded, but the domain layer treats it as an opaque string).
pub type AccessTokenId = String;

/// Monotonically increasing id assigned at stamp time by the service
/// envelope (C6), never by the processors.
pub type TransactionId = u64;

/// Signed integer amount. Balances must never go negative; amounts may be.
pub type CurrencyAmount = i64;

/// What a caller asked the ledger to do, before it has been stamped with an
/// id and a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub account: AccountId,
    pub authorization: TransactionAuthorization,
    #[serde(default)]
    pub access_token: Option<AccessTokenId>,
    pub action: AccountAction,
}

/// A request stamped with an id and a timestamp by the service envelope.
/// This is the unit the processors operate on and the ledger persists.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub performed_at: u128,
    pub account: AccountId,
    pub authorization: TransactionAuthorization,
    pub access_token: Option<AccessTokenId>,
    pub action: AccountAction,
}

impl Transaction {
    pub fn stamp(request: TransactionRequest, id: TransactionId, performed_at: u128) -> Self {
        Self {
            id,
            performed_at,
            account: request.account,
            authorization: request.authorization,
            access_token: request.access_token,
            action: request.action,
        }
    }
}

/// What a successful `apply` hands back to the caller. JSON (de)serialization
/// follows the `{"Case": "...", "Fields": [...]}` convention -- see `wire.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionResult {
    Successful { id: TransactionId },
    History { history: Vec<Transaction> },
    Balance { amount: CurrencyAmount },
    AccessToken { id: AccessTokenId },
    AccessScopes { scopes: BTreeSet<AccessScope> },
}
