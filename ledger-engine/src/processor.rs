use ledger_domain::{
    final_authorizer, in_scope_any, is_admin_authorized, proxy_chain, validate_action, AccessScope,
    AccountAction, Transaction, TransactionError, TransactionResult,
};

use crate::state::ProcessorState;

/// Authenticates and applies one transaction against `state`, returning the
/// new state and the result on success. Never mutates `state` in place --
/// on any failure the caller's `state` is still valid and unchanged.
///
/// Sequencing (short-circuits on first failure):
/// 1. [`validate_action`] -- rejects non-positive `Mint`/`Transfer` amounts.
/// 2. [`authenticate`] -- proxy chain, admin check, account scope, token scope.
/// 3. the acting account must exist (`Unauthorized`, not a "missing
///    destination" error -- the spec treats this as part of authentication).
/// 4. action-specific dispatch.
pub fn apply(
    transaction: &Transaction,
    state: &ProcessorState,
) -> Result<(ProcessorState, TransactionResult), TransactionError> {
    validate_action(&transaction.action)?;

    if !authenticate(transaction, state) {
        return Err(TransactionError::Unauthorized);
    }

    if !state.accounts.contains_key(&transaction.account) {
        return Err(TransactionError::Unauthorized);
    }

    match &transaction.action {
        AccountAction::QueryBalance => {
            let balance = state.accounts[&transaction.account].balance;
            Ok((state.clone(), TransactionResult::Balance { amount: balance }))
        }
        AccountAction::QueryPrivileges => {
            let scopes = state.accounts[&transaction.account].privileges.clone();
            Ok((state.clone(), TransactionResult::AccessScopes { scopes }))
        }
        AccountAction::QueryHistory { .. } => Err(TransactionError::ActionNotImplemented),
        AccountAction::OpenAccount { new_id, initial_token_id } => {
            open_account(state, new_id, initial_token_id)
        }
        AccountAction::CreateToken { token_id, scopes } => {
            create_token(transaction, state, token_id, scopes)
        }
        AccountAction::AddPrivileges { target, scopes } => {
            change_privileges(transaction, state, target, scopes, true)
        }
        AccountAction::RemovePrivileges { target, scopes } => {
            change_privileges(transaction, state, target, scopes, false)
        }
        AccountAction::Mint { amount } => mint(transaction, state, *amount),
        AccountAction::Transfer { amount, destination } => transfer(transaction, state, *amount, destination),
    }
}

/// Conjunction of the four authentication checks described in the design:
/// the proxy chain must be real, an admin-authorized transaction must be
/// backed by admin privilege, the acting account must itself be in scope for
/// the action, and a presented token must admit the action.
fn authenticate(transaction: &Transaction, state: &ProcessorState) -> bool {
    proxy_chain_is_real(transaction, state)
        && admin_check(transaction, state)
        && account_scope_check(transaction, state)
        && token_check(transaction, state)
}

fn proxy_chain_is_real(transaction: &Transaction, state: &ProcessorState) -> bool {
    let chain = proxy_chain(transaction);
    if chain.is_empty() {
        return false;
    }
    if !state.accounts.contains_key(chain.last().unwrap()) {
        return false;
    }
    chain.windows(2).all(|pair| {
        let (x, y) = (&pair[0], &pair[1]);
        state.accounts.get(x).map(|acc| acc.proxy_access.contains(y)).unwrap_or(false)
    })
}

fn admin_check(transaction: &Transaction, state: &ProcessorState) -> bool {
    if !is_admin_authorized(transaction) {
        return true;
    }
    let authorizer = final_authorizer(transaction);
    state
        .accounts
        .get(authorizer)
        .map(|acc| acc.privileges.contains(&AccessScope::Admin) || acc.privileges.contains(&AccessScope::Unbounded))
        .unwrap_or(false)
}

fn account_scope_check(transaction: &Transaction, state: &ProcessorState) -> bool {
    state
        .accounts
        .get(&transaction.account)
        .map(|acc| in_scope_any(&transaction.action, &acc.privileges))
        .unwrap_or(false)
}

fn token_check(transaction: &Transaction, state: &ProcessorState) -> bool {
    let Some(token) = &transaction.access_token else {
        return true;
    };
    let authorizer = final_authorizer(transaction);
    state
        .accounts
        .get(authorizer)
        .and_then(|acc| acc.tokens.get(token))
        .map(|scopes| in_scope_any(&transaction.action, scopes))
        .unwrap_or(false)
}

fn open_account(
    state: &ProcessorState,
    new_id: &str,
    initial_token_id: &str,
) -> Result<(ProcessorState, TransactionResult), TransactionError> {
    if state.accounts.contains_key(new_id) {
        return Err(TransactionError::AccountAlreadyExists);
    }
    let mut next = state.clone();
    next.accounts.insert(
        new_id.to_string(),
        ledger_domain::AccountData::opened_with(state.default_privileges.clone(), initial_token_id.to_string()),
    );
    Ok((next, TransactionResult::AccessToken { id: initial_token_id.to_string() }))
}

fn create_token(
    transaction: &Transaction,
    state: &ProcessorState,
    token_id: &str,
    scopes: &std::collections::BTreeSet<AccessScope>,
) -> Result<(ProcessorState, TransactionResult), TransactionError> {
    let src = &state.accounts[&transaction.account];
    if src.tokens.contains_key(token_id) {
        return Err(TransactionError::TokenAlreadyExists);
    }
    let mut next = state.clone();
    next.accounts
        .get_mut(&transaction.account)
        .unwrap()
        .tokens
        .insert(token_id.to_string(), scopes.clone());
    Ok((next, TransactionResult::AccessToken { id: token_id.to_string() }))
}

fn change_privileges(
    transaction: &Transaction,
    state: &ProcessorState,
    target: &str,
    scopes: &std::collections::BTreeSet<AccessScope>,
    add: bool,
) -> Result<(ProcessorState, TransactionResult), TransactionError> {
    if !state.accounts.contains_key(target) {
        return Err(TransactionError::DestinationDoesNotExist);
    }
    let mut next = state.clone();
    let target_account = next.accounts.get_mut(target).unwrap();
    if add {
        target_account.privileges.extend(scopes.iter().copied());
    } else {
        for scope in scopes {
            target_account.privileges.remove(scope);
        }
    }
    Ok((next, TransactionResult::Successful { id: transaction.id }))
}

fn mint(
    transaction: &Transaction,
    state: &ProcessorState,
    amount: i64,
) -> Result<(ProcessorState, TransactionResult), TransactionError> {
    let mut next = state.clone();
    let balance = &mut next.accounts.get_mut(&transaction.account).unwrap().balance;
    *balance = balance.checked_add(amount).ok_or(TransactionError::InvalidAmount)?;
    Ok((next, TransactionResult::Successful { id: transaction.id }))
}

fn transfer(
    transaction: &Transaction,
    state: &ProcessorState,
    amount: i64,
    destination: &str,
) -> Result<(ProcessorState, TransactionResult), TransactionError> {
    if !state.accounts.contains_key(destination) {
        return Err(TransactionError::DestinationDoesNotExist);
    }
    let source_balance = state.accounts[&transaction.account].balance;
    if source_balance - amount < 0 {
        return Err(TransactionError::InsufficientFunds);
    }
    let mut next = state.clone();
    if transaction.account == destination {
        // Self-transfer: debit and credit the same account, net zero.
        return Ok((next, TransactionResult::Successful { id: transaction.id }));
    }
    let destination_balance = next.accounts.get_mut(destination).unwrap();
    destination_balance.balance =
        destination_balance.balance.checked_add(amount).ok_or(TransactionError::InvalidAmount)?;
    next.accounts.get_mut(&transaction.account).unwrap().balance -= amount;
    Ok((next, TransactionResult::Successful { id: transaction.id }))
}
