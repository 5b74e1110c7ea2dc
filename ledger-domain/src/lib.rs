//! Domain types for the ledger: accounts, scopes, actions, authorization
//! chains, transactions and the fixed set of results/errors they can
//! produce. Everything here is a pure data definition or a pure function
//! over that data -- no I/O, no locking.

pub mod account;
pub mod action;
pub mod authorization;
pub mod error;
pub mod scope;
pub mod transaction;
pub mod wire;

pub use wire::result_to_value;

pub use account::{AccountData, AccountId};
pub use action::{validate_action, AccountAction};
pub use authorization::{
    final_authorizer, is_admin_authorized, proxy_chain, TransactionAuthorization,
};
pub use error::TransactionError;
pub use scope::{in_scope, in_scope_any, AccessScope};
pub use transaction::{
    AccessTokenId, CurrencyAmount, Transaction, TransactionId, TransactionRequest,
    TransactionResult,
};
