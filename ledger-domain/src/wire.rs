//! JSON encoding for the domain's tagged-variant types. The wire contract
//! (6) represents every enum as `{"Case": "<Variant>", "Fields": [...]}`
//! and every record as a plain object; this module is the only place that
//! convention is implemented, via a `serde_json::Value` intermediate so the
//! resulting `Serialize`/`Deserialize` impls still compose with `serde`
//! derives on the records that embed these enums (`Transaction`,
//! `TransactionRequest`, `AccountData`).

use std::collections::BTreeSet;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::account::AccountId;
use crate::action::AccountAction;
use crate::authorization::TransactionAuthorization;
use crate::error::TransactionError;
use crate::scope::AccessScope;
use crate::transaction::{AccessTokenId, CurrencyAmount, Transaction, TransactionId, TransactionResult};

fn case(name: &str, fields: Vec<Value>) -> Value {
    json!({ "Case": name, "Fields": fields })
}

fn decode_case(value: &Value) -> Result<(&str, &Vec<Value>), String> {
    let case = value.get("Case").and_then(Value::as_str).ok_or_else(|| "missing Case".to_string())?;
    static EMPTY: Vec<Value> = Vec::new();
    let fields = match value.get("Fields") {
        Some(Value::Array(a)) => a,
        Some(_) => return Err("Fields must be an array".to_string()),
        None => &EMPTY,
    };
    Ok((case, fields))
}

fn field<T: for<'de> Deserialize<'de>>(fields: &[Value], index: usize) -> Result<T, String> {
    let value = fields.get(index).ok_or_else(|| format!("missing field {index}"))?;
    serde_json::from_value(value.clone()).map_err(|e| e.to_string())
}

macro_rules! wire_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.to_value().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                Self::from_value(&value).map_err(DeError::custom)
            }
        }
    };
}

impl AccessScope {
    fn to_value(&self) -> Value {
        case(self.name_pascal(), vec![])
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        let (tag, _) = decode_case(value)?;
        AccessScope::parse(tag).ok_or_else(|| format!("unknown access scope: {tag}"))
    }

    fn name_pascal(&self) -> &'static str {
        match self {
            AccessScope::Unbounded => "Unbounded",
            AccessScope::QueryBalance => "QueryBalance",
            AccessScope::QueryHistory => "QueryHistory",
            AccessScope::QueryPrivileges => "QueryPrivileges",
            AccessScope::Transfer => "Transfer",
            AccessScope::Mint => "Mint",
            AccessScope::OpenAccount => "OpenAccount",
            AccessScope::Admin => "Admin",
        }
    }
}

wire_serde!(AccessScope);

impl TransactionAuthorization {
    fn to_value(&self) -> Value {
        match self {
            TransactionAuthorization::SelfAuthorized => case("SelfAuthorized", vec![]),
            TransactionAuthorization::AdminAuthorized { admin_id } => {
                case("AdminAuthorized", vec![json!(admin_id)])
            }
            TransactionAuthorization::ProxyAuthorized { proxy_id, tail } => {
                case("ProxyAuthorized", vec![json!(proxy_id), tail.to_value()])
            }
        }
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        let (tag, fields) = decode_case(value)?;
        match tag {
            "SelfAuthorized" => Ok(TransactionAuthorization::SelfAuthorized),
            "AdminAuthorized" => Ok(TransactionAuthorization::AdminAuthorized { admin_id: field(fields, 0)? }),
            "ProxyAuthorized" => {
                let proxy_id: AccountId = field(fields, 0)?;
                let tail_value = fields.get(1).ok_or_else(|| "missing field 1".to_string())?;
                let tail = TransactionAuthorization::from_value(tail_value)?;
                Ok(TransactionAuthorization::ProxyAuthorized { proxy_id, tail: Box::new(tail) })
            }
            other => Err(format!("unknown authorization case: {other}")),
        }
    }
}

wire_serde!(TransactionAuthorization);

impl AccountAction {
    fn to_value(&self) -> Value {
        match self {
            AccountAction::Transfer { amount, destination } => {
                case("Transfer", vec![json!(amount), json!(destination)])
            }
            AccountAction::Mint { amount } => case("Mint", vec![json!(amount)]),
            AccountAction::QueryBalance => case("QueryBalance", vec![]),
            AccountAction::QueryPrivileges => case("QueryPrivileges", vec![]),
            AccountAction::QueryHistory { since } => case("QueryHistory", vec![json!(since)]),
            AccountAction::OpenAccount { new_id, initial_token_id } => {
                case("OpenAccount", vec![json!(new_id), json!(initial_token_id)])
            }
            AccountAction::CreateToken { token_id, scopes } => {
                case("CreateToken", vec![json!(token_id), serde_json::to_value(scopes).unwrap()])
            }
            AccountAction::AddPrivileges { target, scopes } => {
                case("AddPrivileges", vec![json!(target), serde_json::to_value(scopes).unwrap()])
            }
            AccountAction::RemovePrivileges { target, scopes } => {
                case("RemovePrivileges", vec![json!(target), serde_json::to_value(scopes).unwrap()])
            }
        }
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        let (tag, fields) = decode_case(value)?;
        match tag {
            "Transfer" => Ok(AccountAction::Transfer {
                amount: field::<CurrencyAmount>(fields, 0)?,
                destination: field::<AccountId>(fields, 1)?,
            }),
            "Mint" => Ok(AccountAction::Mint { amount: field(fields, 0)? }),
            "QueryBalance" => Ok(AccountAction::QueryBalance),
            "QueryPrivileges" => Ok(AccountAction::QueryPrivileges),
            "QueryHistory" => Ok(AccountAction::QueryHistory { since: field(fields, 0)? }),
            "OpenAccount" => Ok(AccountAction::OpenAccount {
                new_id: field::<AccountId>(fields, 0)?,
                initial_token_id: field::<AccessTokenId>(fields, 1)?,
            }),
            "CreateToken" => Ok(AccountAction::CreateToken {
                token_id: field::<AccessTokenId>(fields, 0)?,
                scopes: field::<BTreeSet<AccessScope>>(fields, 1)?,
            }),
            "AddPrivileges" => Ok(AccountAction::AddPrivileges {
                target: field::<AccountId>(fields, 0)?,
                scopes: field::<BTreeSet<AccessScope>>(fields, 1)?,
            }),
            "RemovePrivileges" => Ok(AccountAction::RemovePrivileges {
                target: field::<AccountId>(fields, 0)?,
                scopes: field::<BTreeSet<AccessScope>>(fields, 1)?,
            }),
            other => Err(format!("unknown action case: {other}")),
        }
    }
}

wire_serde!(AccountAction);

impl TransactionError {
    fn to_value(&self) -> Value {
        match self {
            TransactionError::Unauthorized => case("Unauthorized", vec![]),
            TransactionError::InsufficientFunds => case("InsufficientFunds", vec![]),
            TransactionError::DestinationDoesNotExist => case("DestinationDoesNotExist", vec![]),
            TransactionError::InvalidAmount => case("InvalidAmount", vec![]),
            TransactionError::AccountAlreadyExists => case("AccountAlreadyExists", vec![]),
            TransactionError::TokenAlreadyExists => case("TokenAlreadyExists", vec![]),
            TransactionError::ActionNotImplemented => case("ActionNotImplemented", vec![]),
            TransactionError::Network { code, body } => case("Network", vec![json!(code), json!(body)]),
        }
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        let (tag, fields) = decode_case(value)?;
        match tag {
            "Unauthorized" => Ok(TransactionError::Unauthorized),
            "InsufficientFunds" => Ok(TransactionError::InsufficientFunds),
            "DestinationDoesNotExist" => Ok(TransactionError::DestinationDoesNotExist),
            "InvalidAmount" => Ok(TransactionError::InvalidAmount),
            "AccountAlreadyExists" => Ok(TransactionError::AccountAlreadyExists),
            "TokenAlreadyExists" => Ok(TransactionError::TokenAlreadyExists),
            "ActionNotImplemented" => Ok(TransactionError::ActionNotImplemented),
            "Network" => Ok(TransactionError::Network { code: field(fields, 0)?, body: field(fields, 1)? }),
            other => Err(format!("unknown error case: {other}")),
        }
    }
}

wire_serde!(TransactionError);

impl TransactionResult {
    fn to_value(&self) -> Value {
        match self {
            TransactionResult::Successful { id } => case("Successful", vec![json!(id)]),
            TransactionResult::History { history } => {
                case("History", vec![serde_json::to_value(history).unwrap()])
            }
            TransactionResult::Balance { amount } => case("Balance", vec![json!(amount)]),
            TransactionResult::AccessToken { id } => case("AccessToken", vec![json!(id)]),
            TransactionResult::AccessScopes { scopes } => {
                case("AccessScopes", vec![serde_json::to_value(scopes).unwrap()])
            }
        }
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        let (tag, fields) = decode_case(value)?;
        match tag {
            "Successful" => Ok(TransactionResult::Successful { id: field::<TransactionId>(fields, 0)? }),
            "History" => Ok(TransactionResult::History { history: field::<Vec<Transaction>>(fields, 0)? }),
            "Balance" => Ok(TransactionResult::Balance { amount: field(fields, 0)? }),
            "AccessToken" => Ok(TransactionResult::AccessToken { id: field(fields, 0)? }),
            "AccessScopes" => {
                Ok(TransactionResult::AccessScopes { scopes: field::<BTreeSet<AccessScope>>(fields, 0)? })
            }
            other => Err(format!("unknown result case: {other}")),
        }
    }
}

wire_serde!(TransactionResult);

/// The top-level `Result<TransactionResult, TransactionError>` envelope
/// from (6): `{"Case": "Ok"|"Error", "Fields": [value]}`.
pub fn result_to_value(result: &Result<TransactionResult, TransactionError>) -> Value {
    match result {
        Ok(r) => case("Ok", vec![r.to_value()]),
        Err(e) => case("Error", vec![e.to_value()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId as Id;

    #[test]
    fn access_scope_round_trips() {
        let v = serde_json::to_value(AccessScope::Admin).unwrap();
        assert_eq!(v, json!({ "Case": "Admin", "Fields": [] }));
        let back: AccessScope = serde_json::from_value(v).unwrap();
        assert_eq!(back, AccessScope::Admin);
    }

    #[test]
    fn proxy_authorization_round_trips() {
        let auth = TransactionAuthorization::ProxyAuthorized {
            proxy_id: "foo".to_string(),
            tail: Box::new(TransactionAuthorization::SelfAuthorized),
        };
        let v = serde_json::to_value(&auth).unwrap();
        let back: TransactionAuthorization = serde_json::from_value(v).unwrap();
        assert_eq!(back, auth);
    }

    #[test]
    fn transfer_action_round_trips() {
        let action = AccountAction::Transfer { amount: 10, destination: "dest".to_string() as Id };
        let v = serde_json::to_value(&action).unwrap();
        assert_eq!(v, json!({ "Case": "Transfer", "Fields": [10, "dest"] }));
        let back: AccountAction = serde_json::from_value(v).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn result_envelope_shape() {
        let ok: Result<TransactionResult, TransactionError> =
            Ok(TransactionResult::Balance { amount: 5 });
        assert_eq!(
            result_to_value(&ok),
            json!({ "Case": "Ok", "Fields": [ { "Case": "Balance", "Fields": [5] } ] })
        );
        let err: Result<TransactionResult, TransactionError> = Err(TransactionError::Unauthorized);
        assert_eq!(
            result_to_value(&err),
            json!({ "Case": "Error", "Fields": [ { "Case": "Unauthorized", "Fields": [] } ] })
        );
    }

    #[test]
    fn transaction_error_round_trips_with_payload() {
        let err = TransactionError::Network { code: 503, body: "down".to_string() };
        let v = serde_json::to_value(&err).unwrap();
        let back: TransactionError = serde_json::from_value(v).unwrap();
        assert_eq!(back, err);
    }
}
