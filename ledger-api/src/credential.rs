use ledger_domain::{AccessTokenId, AccountId};

/// The shape of the external credential store a chat front-end would keep:
/// given a platform-specific user id, look up the ledger account and access
/// token it owns. No implementation ships in this crate -- a front-end
/// implements this against whatever storage it already has, and hands the
/// result to [`crate::envelope::Envelope::apply_untrusted`].
pub trait CredentialLookup {
    fn account_id_for(&self, platform_user: &str) -> Option<(AccountId, AccessTokenId)>;
}
