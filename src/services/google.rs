//! Google OAuth identity provider: redirect URL, code exchange and profile fetch.
//!
//! DESIGN
//! ======
//! Sign-in is a plain authorization-code flow. A random state token is kept
//! between `sign_in_with_redirect` and `complete_sign_in` and compared to the
//! callback's value before the code is exchanged. The resulting identity is
//! published on a `watch` channel; there is no persisted session, so every
//! process starts signed out.

#[cfg(test)]
#[path = "google_test.rs"]
mod google_test;

use std::fmt::Write;
use std::sync::Mutex;

use rand::Rng;
use reqwest::Url;
use tokio::sync::watch;

use super::identity::{IdentityError, IdentityProvider, IdentityRecord};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Hosted-domain hint shown on the account chooser (e.g. `miamioh.edu`).
    pub hosted_domain: Option<String>,
}

impl GoogleConfig {
    /// Build the Google authorization URL for the given state token.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be parsed with the parameters.
    pub fn authorize_url(&self, state: &str) -> Result<String, IdentityError> {
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("prompt", "select_account"),
            ("state", state),
        ];
        if let Some(hd) = &self.hosted_domain {
            params.push(("hd", hd.as_str()));
        }
        Url::parse_with_params(AUTHORIZE_URL, &params)
            .map(String::from)
            .map_err(|e| IdentityError::Redirect(e.to_string()))
    }
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, serde::Deserialize)]
struct UserInfo {
    email: String,
    name: Option<String>,
}

fn generate_state() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// `IdentityProvider` backed by Google OAuth.
pub struct GoogleIdentity {
    config: GoogleConfig,
    http: reqwest::Client,
    pending_state: Mutex<Option<String>>,
    current: watch::Sender<Option<IdentityRecord>>,
}

impl GoogleIdentity {
    #[must_use]
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            pending_state: Mutex::new(None),
            current: watch::Sender::new(None),
        }
    }

    /// Consume the pending state token, checking it against the callback's.
    fn take_pending_state(&self, state: &str) -> Result<(), IdentityError> {
        let mut pending = self
            .pending_state
            .lock()
            .map_err(|_| IdentityError::StateMismatch)?;
        match pending.take() {
            Some(expected) if !expected.is_empty() && expected == state => Ok(()),
            _ => Err(IdentityError::StateMismatch),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<String, IdentityError> {
        let resp = self
            .http
            .post(TOKEN_URL)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| IdentityError::TokenExchange(e.to_string()))?;

        let body = resp
            .text()
            .await
            .map_err(|e| IdentityError::TokenExchange(e.to_string()))?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|_| IdentityError::TokenExchange(format!("unexpected response: {body}")))?;
        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo, IdentityError> {
        let resp = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Profile(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(IdentityError::Profile(format!("status {}", resp.status())));
        }
        resp.json::<UserInfo>()
            .await
            .map_err(|e| IdentityError::Profile(e.to_string()))
    }

    /// Every completed sign-in is announced, even for the same identity, so
    /// a pending login always gets an answer.
    fn publish_sign_in(&self, identity: IdentityRecord) {
        self.current.send_replace(Some(identity));
    }

    fn publish_sign_out(&self) {
        self.current.send_if_modified(|current| current.take().is_some());
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleIdentity {
    fn subscribe(&self) -> watch::Receiver<Option<IdentityRecord>> {
        self.current.subscribe()
    }

    async fn sign_in_with_redirect(&self) -> Result<String, IdentityError> {
        let state = generate_state();
        let url = self.config.authorize_url(&state)?;
        if let Ok(mut pending) = self.pending_state.lock() {
            *pending = Some(state);
        }
        Ok(url)
    }

    async fn complete_sign_in(&self, code: &str, state: &str) -> Result<(), IdentityError> {
        self.take_pending_state(state)?;
        let access_token = self.exchange_code(code).await?;
        let info = self.fetch_user_info(&access_token).await?;
        tracing::info!(email = %info.email, "google sign-in completed");
        self.publish_sign_in(IdentityRecord { email: info.email, name: info.name });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.publish_sign_out();
        Ok(())
    }
}
