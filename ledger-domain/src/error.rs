use thiserror::Error;

/// The closed set of failures a transaction can surface. `ActionNotImplemented`
/// is an internal sentinel meaning "pass to the next layer" (C4 recognises
/// it for `QueryHistory`); it must never reach the HTTP boundary.
/// `Network` is populated only on the client side, when a `TransactionResult`
/// never came back from the service at all. JSON (de)serialization follows
/// the `{"Case": "...", "Fields": [...]}` convention -- see `wire.rs`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("destination does not exist")]
    DestinationDoesNotExist,
    #[error("invalid amount")]
    InvalidAmount,
    #[error("account already exists")]
    AccountAlreadyExists,
    #[error("token already exists")]
    TokenAlreadyExists,
    #[error("action not implemented")]
    ActionNotImplemented,
    #[error("network error {code}: {body}")]
    Network { code: u16, body: String },
}
