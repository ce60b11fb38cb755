//! Identity provider contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider owns sign-in and sign-out; the app only learns the outcome
//! through the `subscribe` channel, exactly like an auth-state listener.

use tokio::sync::watch;

/// Identity reported by the provider after a successful sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityRecord {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("sign-in redirect could not be built: {0}")]
    Redirect(String),
    #[error("sign-in state mismatch")]
    StateMismatch,
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("identity fetch failed: {0}")]
    Profile(String),
    #[error("sign-out failed: {0}")]
    SignOut(String),
}

/// Redirect-based identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Auth-state notifications. The current value is the identity at the
    /// time of subscribing; `None` means signed out.
    fn subscribe(&self) -> watch::Receiver<Option<IdentityRecord>>;

    /// Start a redirect sign-in, returning the URL the user must visit.
    async fn sign_in_with_redirect(&self) -> Result<String, IdentityError>;

    /// Finish a redirect sign-in with the parameters the provider sent back.
    async fn complete_sign_in(&self, code: &str, state: &str) -> Result<(), IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}
