use borsh::{BorshDeserialize, BorshSerialize};

use crate::account::AccountId;
use crate::transaction::Transaction;

/// Head-to-tail chain of principals authorizing a transaction. Read
/// head-first: each `ProxyAuthorized` hop names an account permitted to act
/// as proxy for the next link, terminating in either the subject itself
/// (`SelfAuthorized`) or an admin acting on the subject's behalf
/// (`AdminAuthorized`). JSON (de)serialization follows the
/// `{"Case": "...", "Fields": [...]}` convention -- see `wire.rs`.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub enum TransactionAuthorization {
    SelfAuthorized,
    AdminAuthorized { admin_id: AccountId },
    ProxyAuthorized { proxy_id: AccountId, tail: Box<TransactionAuthorization> },
}

/// The full chain of accounts from the outermost proxy down to the subject,
/// read head-first. `ProxyAuthorized("foo", ProxyAuthorized("admin", Self))`
/// on account `@gov` yields `["foo", "admin", "@gov"]`.
pub fn proxy_chain(transaction: &Transaction) -> Vec<AccountId> {
    let mut chain = Vec::new();
    collect_hops(&transaction.authorization, &mut chain);
    chain.push(final_authorizer(transaction).to_string());
    chain
}

fn collect_hops(auth: &TransactionAuthorization, out: &mut Vec<AccountId>) {
    if let TransactionAuthorization::ProxyAuthorized { proxy_id, tail } = auth {
        out.push(proxy_id.clone());
        collect_hops(tail, out);
    }
}

/// The innermost non-proxy principal: the subject itself under
/// `SelfAuthorized`, or the admin under `AdminAuthorized`.
pub fn final_authorizer(transaction: &Transaction) -> &str {
    fn walk<'a>(auth: &'a TransactionAuthorization, account: &'a str) -> &'a str {
        match auth {
            TransactionAuthorization::SelfAuthorized => account,
            TransactionAuthorization::AdminAuthorized { admin_id } => admin_id,
            TransactionAuthorization::ProxyAuthorized { tail, .. } => walk(tail, account),
        }
    }
    walk(&transaction.authorization, &transaction.account)
}

/// True iff some node in the authorization chain is `AdminAuthorized`.
pub fn is_admin_authorized(transaction: &Transaction) -> bool {
    fn walk(auth: &TransactionAuthorization) -> bool {
        match auth {
            TransactionAuthorization::SelfAuthorized => false,
            TransactionAuthorization::AdminAuthorized { .. } => true,
            TransactionAuthorization::ProxyAuthorized { tail, .. } => walk(tail),
        }
    }
    walk(&transaction.authorization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::AccountAction;

    fn tx(account: &str, authorization: TransactionAuthorization) -> Transaction {
        Transaction {
            id: 1,
            performed_at: 0,
            account: account.to_string(),
            authorization,
            access_token: None,
            action: AccountAction::QueryBalance,
        }
    }

    /// P6 / scenario 6: proxy chain round trip.
    #[test]
    fn proxy_chain_round_trip() {
        let t = tx(
            "@government",
            TransactionAuthorization::ProxyAuthorized {
                proxy_id: "foo".to_string(),
                tail: Box::new(TransactionAuthorization::ProxyAuthorized {
                    proxy_id: "admin".to_string(),
                    tail: Box::new(TransactionAuthorization::SelfAuthorized),
                }),
            },
        );
        assert_eq!(proxy_chain(&t), vec!["foo", "admin", "@government"]);
        assert_eq!(final_authorizer(&t), "@government");
    }

    #[test]
    fn self_authorized_chain_is_singleton() {
        let t = tx("@gov", TransactionAuthorization::SelfAuthorized);
        assert_eq!(proxy_chain(&t), vec!["@gov"]);
        assert_eq!(final_authorizer(&t), "@gov");
        assert!(!is_admin_authorized(&t));
    }

    #[test]
    fn admin_authorized_detection() {
        let t = tx(
            "user",
            TransactionAuthorization::AdminAuthorized { admin_id: "@root".to_string() },
        );
        assert!(is_admin_authorized(&t));
        assert_eq!(final_authorizer(&t), "@root");
        assert_eq!(proxy_chain(&t), vec!["@root"]);
    }
}
