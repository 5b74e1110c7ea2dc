use borsh::{BorshDeserialize, BorshSerialize};

use crate::action::AccountAction;

/// Capability tag carried by an account's privileges and by the scope set of
/// an access token. `Unbounded` admits any action; every other variant gates
/// exactly one kind of action (see [`in_scope`]). JSON (de)serialization
/// follows the `{"Case": "...", "Fields": []}` convention -- see `wire.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize)]
pub enum AccessScope {
    Unbounded,
    QueryBalance,
    QueryHistory,
    QueryPrivileges,
    Transfer,
    Mint,
    OpenAccount,
    Admin,
}

impl AccessScope {
    /// Case-insensitive lowercase-with-dashes name, used by the command
    /// parser and by boot-time console output.
    pub fn name(&self) -> &'static str {
        match self {
            AccessScope::Unbounded => "unbounded",
            AccessScope::QueryBalance => "query-balance",
            AccessScope::QueryHistory => "query-history",
            AccessScope::QueryPrivileges => "query-privileges",
            AccessScope::Transfer => "transfer",
            AccessScope::Mint => "mint",
            AccessScope::OpenAccount => "open-account",
            AccessScope::Admin => "admin",
        }
    }

    pub fn parse(name: &str) -> Option<AccessScope> {
        match name.to_ascii_lowercase().as_str() {
            "unbounded" => Some(AccessScope::Unbounded),
            "query-balance" | "querybalance" => Some(AccessScope::QueryBalance),
            "query-history" | "queryhistory" => Some(AccessScope::QueryHistory),
            "query-privileges" | "queryprivileges" => Some(AccessScope::QueryPrivileges),
            "transfer" => Some(AccessScope::Transfer),
            "mint" => Some(AccessScope::Mint),
            "open-account" | "openaccount" => Some(AccessScope::OpenAccount),
            "admin" => Some(AccessScope::Admin),
            _ => None,
        }
    }
}

/// True iff `scope` admits `action`. `Unbounded` admits everything;
/// otherwise each action maps to exactly one non-administrative scope, and
/// the three administrative actions (`AddPrivileges`, `RemovePrivileges`,
/// `CreateToken`) map only to `Admin`.
pub fn in_scope(action: &AccountAction, scope: AccessScope) -> bool {
    if scope == AccessScope::Unbounded {
        return true;
    }
    match action {
        AccountAction::Transfer { .. } => scope == AccessScope::Transfer,
        AccountAction::Mint { .. } => scope == AccessScope::Mint,
        AccountAction::QueryBalance => scope == AccessScope::QueryBalance,
        AccountAction::QueryPrivileges => scope == AccessScope::QueryPrivileges,
        AccountAction::QueryHistory { .. } => scope == AccessScope::QueryHistory,
        AccountAction::OpenAccount { .. } => scope == AccessScope::OpenAccount,
        AccountAction::CreateToken { .. }
        | AccountAction::AddPrivileges { .. }
        | AccountAction::RemovePrivileges { .. } => scope == AccessScope::Admin,
    }
}

/// True iff some scope in `scopes` admits `action`.
pub fn in_scope_any<'a, I>(action: &AccountAction, scopes: I) -> bool
where
    I: IntoIterator<Item = &'a AccessScope>,
{
    scopes.into_iter().any(|s| in_scope(action, *s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;

    fn all_scopes() -> Vec<AccessScope> {
        vec![
            AccessScope::Unbounded,
            AccessScope::QueryBalance,
            AccessScope::QueryHistory,
            AccessScope::QueryPrivileges,
            AccessScope::Transfer,
            AccessScope::Mint,
            AccessScope::OpenAccount,
            AccessScope::Admin,
        ]
    }

    /// P7: for each concrete action there is exactly one non-`Unbounded`
    /// scope that admits it.
    #[test]
    fn scope_minimality() {
        let actions = vec![
            AccountAction::Transfer { amount: 1, destination: "x".to_string() },
            AccountAction::Mint { amount: 1 },
            AccountAction::QueryBalance,
            AccountAction::QueryPrivileges,
            AccountAction::QueryHistory { since: 0 },
            AccountAction::OpenAccount { new_id: "x".to_string(), initial_token_id: "t".to_string() },
            AccountAction::CreateToken { token_id: "t".to_string(), scopes: Default::default() },
            AccountAction::AddPrivileges { target: "x".to_string(), scopes: Default::default() },
            AccountAction::RemovePrivileges { target: "x".to_string(), scopes: Default::default() },
        ];
        for action in &actions {
            let admitting: Vec<AccessScope> = all_scopes()
                .into_iter()
                .filter(|s| *s != AccessScope::Unbounded && in_scope(action, *s))
                .collect();
            assert_eq!(admitting.len(), 1, "action {:?} admitted by {:?}", action, admitting);
        }
    }

    #[test]
    fn unbounded_admits_everything() {
        let action = AccountAction::QueryBalance;
        assert!(in_scope(&action, AccessScope::Unbounded));
    }

    #[test]
    fn admin_only_actions_require_admin() {
        let action = AccountAction::AddPrivileges {
            target: "x".to_string() as AccountId,
            scopes: Default::default(),
        };
        assert!(!in_scope(&action, AccessScope::Transfer));
        assert!(in_scope(&action, AccessScope::Admin));
    }

    #[test]
    fn scope_name_round_trips() {
        for scope in all_scopes() {
            assert_eq!(AccessScope::parse(scope.name()), Some(scope));
        }
    }
}
