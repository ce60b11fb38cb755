//! Global auth store: reactive state, mutations, and actions.
//!
//! DESIGN
//! ======
//! The store is the single writer of `AuthState`. State lives in a `watch`
//! channel so readers (router, view layer) take cheap snapshots and can await
//! transitions such as "first resolution" or "no longer loading" without
//! polling or re-subscribing to the identity provider.
//!
//! The router depends on the store, and store actions navigate, so the store
//! holds its navigator weakly; it is attached once during app wiring.
//!
//! ERROR HANDLING
//! ==============
//! Provider and directory failures never escape an action. They are logged,
//! surfaced as an error toast, and (for session resolution) end in a forced
//! logout. Policy denials are plain checks with the same outcome plus an
//! analytics event.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Arc, OnceLock, Weak};

use tokio::sync::watch;

use crate::router::Navigator;
use crate::services::analytics::{Analytics, AnalyticsEvent};
use crate::services::directory::Directory;
use crate::services::identity::{IdentityProvider, IdentityRecord};
use crate::services::toast::{Toast, ToastLevel, Toaster};
use crate::state::auth::{AuthState, UserSlot};
use crate::state::session::SessionUser;

pub(crate) const LOGIN_FAILED: &str = "Error logging you in. Please try again shortly.";
const LOGOUT_FAILED: &str = "Error logging you out. Please try again shortly.";
const LOOKUP_FAILED: &str = "Error checking your access. Please try again shortly.";

/// Who may sign in, and how denials are worded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Required email domain, without the `@`.
    pub domain: String,
    pub institution_name: String,
    pub access_contact: String,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            domain: "miamioh.edu".to_owned(),
            institution_name: "Miami University".to_owned(),
            access_contact: "Professor Ferris".to_owned(),
        }
    }
}

impl AccessPolicy {
    /// Whether the email belongs to the institutional domain.
    #[must_use]
    pub fn accepts(&self, email: &str) -> bool {
        email
            .rsplit_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.eq_ignore_ascii_case(&self.domain))
    }

    fn wrong_domain_message(&self) -> String {
        format!("Please use your {} email account.", self.institution_name)
    }

    fn unauthorized_message(&self) -> String {
        format!("You are not authorized. Contact {} if you think this is an error.", self.access_contact)
    }
}

pub struct Store {
    state: watch::Sender<AuthState>,
    identity: Arc<dyn IdentityProvider>,
    directory: Arc<dyn Directory>,
    analytics: Arc<dyn Analytics>,
    toaster: Arc<dyn Toaster>,
    policy: AccessPolicy,
    navigator: OnceLock<Weak<dyn Navigator>>,
}

impl Store {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        directory: Arc<dyn Directory>,
        analytics: Arc<dyn Analytics>,
        toaster: Arc<dyn Toaster>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            state: watch::Sender::new(AuthState::default()),
            identity,
            directory,
            analytics,
            toaster,
            policy,
            navigator: OnceLock::new(),
        }
    }

    /// Attach the navigator used by actions. Only the first call has effect.
    pub fn attach_navigator(&self, navigator: Weak<dyn Navigator>) {
        if self.navigator.set(navigator).is_err() {
            tracing::warn!("store navigator already attached");
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Completes once the user slot has been assigned at least once.
    pub async fn resolved(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail while awaited.
        let _ = rx.wait_for(|s| s.user.is_resolved()).await;
    }

    /// Completes once `loading` is false.
    pub async fn settled(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|s| !s.loading).await;
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    pub fn set_auth_loading(&self, loading: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }

    pub fn set_auth_user(&self, user: Option<SessionUser>) {
        self.state.send_modify(|s| s.user = UserSlot::from(user));
    }

    // =========================================================================
    // TOASTS
    // =========================================================================

    pub fn error_toast(&self, message: &str) {
        self.toast(ToastLevel::Error, message);
    }

    pub fn info_toast(&self, message: &str) {
        self.toast(ToastLevel::Info, message);
    }

    pub fn success_toast(&self, message: &str) {
        self.toast(ToastLevel::Success, message);
    }

    fn toast(&self, level: ToastLevel, message: &str) {
        self.toaster.show(Toast { level, message: message.to_owned() });
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Start a redirect sign-in. Returns the provider URL to send the user to,
    /// or `None` if the redirect could not be started.
    pub async fn login(&self) -> Option<String> {
        self.set_auth_loading(true);
        match self.identity.sign_in_with_redirect().await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!(error = %e, "login failed");
                self.error_toast(LOGIN_FAILED);
                self.set_auth_loading(false);
                None
            }
        }
    }

    /// Sign out and return to `/`. Safe to call when already signed out.
    pub async fn logout(&self) {
        self.set_auth_loading(true);
        match self.identity.sign_out().await {
            Ok(()) => {
                self.end_session();
                self.navigate("/").await;
            }
            Err(e) => {
                tracing::error!(error = %e, "logout failed");
                self.error_toast(LOGOUT_FAILED);
            }
        }
        self.set_auth_loading(false);
    }

    /// Resolve or deny the session after an identity-provider notification.
    pub async fn auth_state_changed(&self, identity: Option<IdentityRecord>) {
        let Some(identity) = identity else {
            self.end_session();
            self.set_auth_loading(false);
            return;
        };
        let email = identity.email;

        if !self.policy.accepts(&email) {
            tracing::info!(%email, "sign-in denied: outside institutional domain");
            self.analytics.log_event(AnalyticsEvent::NonInstitutionalEmail { email });
            self.deny(&self.policy.wrong_domain_message()).await;
            return;
        }

        let records = match self.directory.records_for_email(&email).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, %email, "authorization lookup failed");
                self.deny(LOOKUP_FAILED).await;
                return;
            }
        };

        let Some(user) = SessionUser::from_records(&records) else {
            tracing::info!(%email, "sign-in denied: no authorization records");
            self.analytics.log_event(AnalyticsEvent::UnauthorizedUser { email });
            self.deny(&self.policy.unauthorized_message()).await;
            return;
        };

        let role = user.highest_role;
        tracing::info!(email = %user.email, %role, sections = user.sections.len(), "signed in");
        self.analytics.log_event(AnalyticsEvent::Login { role, email: user.email.clone() });
        let welcome = format!("Welcome back, {}", user.name);
        self.set_auth_user(Some(user));
        self.success_toast(&welcome);
        self.navigate(role.default_route()).await;
        self.set_auth_loading(false);
    }

    /// Clear the user, report, and force a sign-out.
    async fn deny(&self, message: &str) {
        self.set_auth_user(None);
        self.error_toast(message);
        self.logout().await;
    }

    /// Clear the user, saying goodbye if one was signed in.
    fn end_session(&self) {
        let name = self.state.borrow().user().map(|u| u.name.clone());
        if let Some(name) = name {
            self.success_toast(&format!("Goodbye, {name}!"));
        }
        self.set_auth_user(None);
    }

    async fn navigate(&self, path: &str) {
        let Some(navigator) = self.navigator.get().and_then(Weak::upgrade) else {
            tracing::warn!(%path, "navigation skipped: no navigator attached");
            return;
        };
        if let Err(e) = navigator.push(path).await {
            tracing::warn!(error = %e, %path, "navigation failed");
        }
    }
}
