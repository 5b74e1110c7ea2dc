//! A small, free-form, word-based command language (C5). A tokenizer splits
//! input on ASCII whitespace; a recursive-descent parser recognises an
//! optional stack of `proxy` hops, an optional single `admin` hop, and
//! exactly one action keyword, then lowers the result into a
//! [`TransactionRequest`].

use std::collections::BTreeSet;

use ledger_domain::{AccessScope, AccountAction, AccountId, TransactionAuthorization, TransactionRequest};
use thiserror::Error;

/// One whitespace-delimited token, carrying its original text and the byte
/// offset it started at (useful for front-ends that want to point at the
/// offending word in an error message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start_index: usize,
}

/// Splits `input` on ASCII whitespace (space, tab, CR, LF).
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if c == ' ' || c == '\t' || c == '\r' || c == '\n' {
            if !current.is_empty() {
                tokens.push(Token { text: std::mem::take(&mut current), start_index: start });
            }
        } else {
            if current.is_empty() {
                start = i;
            }
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(Token { text: current, start_index: start });
    }
    tokens
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("expected a number: {0}")]
    ExpectedNumber(String),
    #[error("expected a positive number: {0}")]
    ExpectedPositiveNumber(String),
    #[error("unexpected proxy keyword: {0}")]
    UnexpectedProxy(String),
    #[error("unexpected admin keyword: {0}")]
    UnexpectedAdmin(String),
    #[error("unfinished command")]
    UnfinishedCommand,
}

/// A parsed command: the proxy/admin prefix plus the action, not yet tied to
/// an author account or a token (that happens in [`lower`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub proxies: Vec<AccountId>,
    pub admin: Option<AccountId>,
    pub action: AccountAction,
}

struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect_account(&mut self) -> Result<AccountId, CommandParseError> {
        match self.next() {
            Some(t) => Ok(t.text.clone()),
            None => Err(CommandParseError::UnfinishedCommand),
        }
    }

    fn expect_amount(&mut self, positive: bool) -> Result<i64, CommandParseError> {
        let token = self.next().ok_or(CommandParseError::UnfinishedCommand)?;
        let amount: i64 = token
            .text
            .parse()
            .map_err(|_| CommandParseError::ExpectedNumber(token.text.clone()))?;
        if positive && amount <= 0 {
            return Err(CommandParseError::ExpectedPositiveNumber(token.text.clone()));
        }
        Ok(amount)
    }

    fn expect_scopes(&mut self) -> Result<BTreeSet<AccessScope>, CommandParseError> {
        let mut scopes = BTreeSet::new();
        while let Some(token) = self.peek() {
            match AccessScope::parse(&token.text) {
                Some(scope) => {
                    scopes.insert(scope);
                    self.next();
                }
                None => break,
            }
        }
        Ok(scopes)
    }
}

fn normalize_keyword(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    match lower.as_str() {
        "bal" => "balance".to_string(),
        other => other.to_string(),
    }
}

/// Parses a full command line: `( "proxy" account )* ( "admin" account )? action`.
pub fn parse(tokens: &[Token]) -> Result<Command, CommandParseError> {
    let mut cursor = Cursor { tokens, pos: 0 };
    let mut proxies = Vec::new();

    loop {
        match cursor.peek() {
            Some(t) if normalize_keyword(&t.text) == "proxy" => {
                cursor.next();
                proxies.push(cursor.expect_account()?);
            }
            _ => break,
        }
    }

    let mut admin = None;
    if let Some(t) = cursor.peek() {
        if normalize_keyword(&t.text) == "admin" {
            cursor.next();
            admin = Some(cursor.expect_account()?);
        }
    }

    // A stray `proxy`/`admin` keyword past its permitted prefix position is
    // a distinct error from "unknown command", so it is checked before
    // falling through to action dispatch.
    if let Some(t) = cursor.peek() {
        let normalized = normalize_keyword(&t.text);
        if normalized == "proxy" {
            return Err(CommandParseError::UnexpectedProxy(t.text.clone()));
        }
        if normalized == "admin" {
            return Err(CommandParseError::UnexpectedAdmin(t.text.clone()));
        }
    }

    let action = parse_action(&mut cursor)?;

    if let Some(t) = cursor.peek() {
        return Err(CommandParseError::UnexpectedToken(t.text.clone()));
    }

    Ok(Command { proxies, admin, action })
}

fn parse_action(cursor: &mut Cursor) -> Result<AccountAction, CommandParseError> {
    let keyword_token = cursor.next().ok_or(CommandParseError::UnfinishedCommand)?;
    let keyword = normalize_keyword(&keyword_token.text);
    match keyword.as_str() {
        "balance" => Ok(AccountAction::QueryBalance),
        "privileges" => Ok(AccountAction::QueryPrivileges),
        "history" => {
            let since = match cursor.peek() {
                Some(t) => t.text.parse::<u128>().map_err(|_| CommandParseError::ExpectedNumber(t.text.clone()))?,
                None => 0,
            };
            if cursor.peek().is_some() {
                cursor.next();
            }
            Ok(AccountAction::QueryHistory { since })
        }
        "mint" => {
            let amount = cursor.expect_amount(true)?;
            Ok(AccountAction::Mint { amount })
        }
        "transfer" => {
            let destination = cursor.expect_account()?;
            let amount = cursor.expect_amount(true)?;
            Ok(AccountAction::Transfer { amount, destination })
        }
        "open" => {
            let new_id = cursor.expect_account()?;
            let initial_token_id = cursor.expect_account()?;
            Ok(AccountAction::OpenAccount { new_id, initial_token_id })
        }
        "token" => {
            let token_id = cursor.expect_account()?;
            let scopes = cursor.expect_scopes()?;
            Ok(AccountAction::CreateToken { token_id, scopes })
        }
        "grant" => {
            let target = cursor.expect_account()?;
            let scopes = cursor.expect_scopes()?;
            if scopes.is_empty() && cursor.peek().is_none() {
                return Err(CommandParseError::UnfinishedCommand);
            }
            Ok(AccountAction::AddPrivileges { target, scopes })
        }
        "revoke" => {
            let target = cursor.expect_account()?;
            let scopes = cursor.expect_scopes()?;
            if scopes.is_empty() && cursor.peek().is_none() {
                return Err(CommandParseError::UnfinishedCommand);
            }
            Ok(AccountAction::RemovePrivileges { target, scopes })
        }
        _ => Err(CommandParseError::UnknownCommand(keyword_token.text.clone())),
    }
}

/// Lowers a parsed [`Command`] into a [`TransactionRequest`] for author
/// account `author` presenting token `token`. The proxy hops wrap the tail
/// outward in reverse collection order, so `[p1, p2]` becomes
/// `Proxy(p1, Proxy(p2, tail))` -- equivalently, `proxies` prepended to
/// `[account]` equals the chain [`ledger_domain::proxy_chain`] would report.
pub fn lower(command: Command, author: AccountId, token: Option<String>) -> TransactionRequest {
    let (account, mut authorization) = match command.admin {
        Some(admin_id) => (admin_id, TransactionAuthorization::AdminAuthorized { admin_id: author }),
        None => (author, TransactionAuthorization::SelfAuthorized),
    };

    for proxy_id in command.proxies.into_iter().rev() {
        authorization = TransactionAuthorization::ProxyAuthorized { proxy_id, tail: Box::new(authorization) };
    }

    TransactionRequest { account, authorization, access_token: token, action: command.action }
}

/// Convenience entry point: tokenize, parse, and lower in one call.
pub fn parse_command(input: &str, author: AccountId, token: Option<String>) -> Result<TransactionRequest, CommandParseError> {
    let tokens = tokenize(input);
    let command = parse(&tokens)?;
    Ok(lower(command, author, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(input: &str) -> TransactionRequest {
        parse_command(input, "A".to_string(), Some("T".to_string())).unwrap()
    }

    #[test]
    fn balance_round_trip() {
        let r = req("balance");
        assert_eq!(r.account, "A");
        assert_eq!(r.authorization, TransactionAuthorization::SelfAuthorized);
        assert_eq!(r.action, AccountAction::QueryBalance);
    }

    #[test]
    fn bal_abbreviation_expands() {
        let r = req("bal");
        assert_eq!(r.action, AccountAction::QueryBalance);
    }

    #[test]
    fn proxy_prefix() {
        let r = req("proxy X balance");
        assert_eq!(r.account, "A");
        assert_eq!(
            r.authorization,
            TransactionAuthorization::ProxyAuthorized {
                proxy_id: "X".to_string(),
                tail: Box::new(TransactionAuthorization::SelfAuthorized)
            }
        );
    }

    #[test]
    fn admin_prefix() {
        let r = req("admin X balance");
        assert_eq!(r.account, "X");
        assert_eq!(r.authorization, TransactionAuthorization::AdminAuthorized { admin_id: "A".to_string() });
    }

    #[test]
    fn proxy_then_admin() {
        let r = req("proxy X admin Y balance");
        assert_eq!(r.account, "Y");
        assert_eq!(
            r.authorization,
            TransactionAuthorization::ProxyAuthorized {
                proxy_id: "X".to_string(),
                tail: Box::new(TransactionAuthorization::AdminAuthorized { admin_id: "A".to_string() })
            }
        );
    }

    #[test]
    fn trailing_token_is_unexpected() {
        let tokens = tokenize("balance foo");
        assert_eq!(parse(&tokens), Err(CommandParseError::UnexpectedToken("foo".to_string())));
    }

    #[test]
    fn negative_mint_amount_rejected() {
        let tokens = tokenize("mint -5");
        assert_eq!(parse(&tokens), Err(CommandParseError::ExpectedPositiveNumber("-5".to_string())));
    }

    #[test]
    fn non_numeric_amount_rejected() {
        let tokens = tokenize("mint abc");
        assert_eq!(parse(&tokens), Err(CommandParseError::ExpectedNumber("abc".to_string())));
    }

    #[test]
    fn unknown_command_rejected() {
        let tokens = tokenize("frobnicate");
        assert_eq!(parse(&tokens), Err(CommandParseError::UnknownCommand("frobnicate".to_string())));
    }

    #[test]
    fn admin_after_action_keyword_position_is_unexpected() {
        // admin must precede the action; once the action has started
        // consuming tokens, a bare "admin" is just an unexpected token for
        // transfer's destination parse, but a free-standing "admin" with
        // nothing after the action keyword trips the prefix check instead
        // when it appears before any action keyword is recognised twice.
        let tokens = tokenize("admin X admin Y balance");
        assert_eq!(parse(&tokens), Err(CommandParseError::UnexpectedAdmin("admin".to_string())));
    }

    #[test]
    fn stray_proxy_after_admin_is_unexpected() {
        let tokens = tokenize("admin X proxy Y balance");
        assert_eq!(parse(&tokens), Err(CommandParseError::UnexpectedProxy("proxy".to_string())));
    }

    #[test]
    fn transfer_round_trip() {
        let r = req("transfer dest 10");
        assert_eq!(r.action, AccountAction::Transfer { amount: 10, destination: "dest".to_string() });
    }

    #[test]
    fn grant_with_scopes() {
        let r = req("grant bob admin mint");
        assert_eq!(
            r.action,
            AccountAction::AddPrivileges {
                target: "bob".to_string(),
                scopes: BTreeSet::from([AccessScope::Admin, AccessScope::Mint])
            }
        );
    }

    #[test]
    fn grant_without_scopes_is_unfinished() {
        let tokens = tokenize("grant bob");
        assert_eq!(parse(&tokens), Err(CommandParseError::UnfinishedCommand));
    }

    #[test]
    fn history_without_since_defaults_to_zero() {
        let r = req("history");
        assert_eq!(r.action, AccountAction::QueryHistory { since: 0 });
    }

    #[test]
    fn history_with_since() {
        let r = req("history 1500");
        assert_eq!(r.action, AccountAction::QueryHistory { since: 1500 });
    }

    #[test]
    fn open_account_round_trip() {
        let r = req("open newacct tok1");
        assert_eq!(
            r.action,
            AccountAction::OpenAccount { new_id: "newacct".to_string(), initial_token_id: "tok1".to_string() }
        );
    }
}
