//! Client-side router with an auth-aware navigation guard.
//!
//! ARCHITECTURE
//! ============
//! `push` runs the before-each guard against the store's auth state. A
//! redirect re-enters the guard for the new target, so a chain such as
//! `/` → `/director` is checked end to end. Once a target is allowed the
//! current location is replaced and the after-each hook logs the change.
//!
//! The guard never reads an unresolved auth state: it first awaits the
//! store's resolution future, which completes once the first identity
//! notification has been handled.

pub mod guard;
pub mod table;


use std::sync::Arc;

use tokio::sync::watch;

use crate::services::analytics::{Analytics, AnalyticsEvent};
use crate::store::Store;
use guard::Decision;
pub use table::{Location, View};

/// Upper bound on guard redirects within one navigation.
pub const MAX_REDIRECTS: usize = 8;

const ACCESS_DENIED: &str = "You are not authorized to access that page!";

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation to {to} exceeded {limit} redirects")]
    TooManyRedirects { to: String, limit: usize },
}

/// Anything that can move the app to a new location.
#[async_trait::async_trait]
pub trait Navigator: Send + Sync {
    /// Navigate to `to`, returning the location actually reached.
    async fn push(&self, to: &str) -> Result<Location, NavigationError>;
}

pub struct Router {
    store: Arc<Store>,
    analytics: Arc<dyn Analytics>,
    current: watch::Sender<Location>,
}

impl Router {
    #[must_use]
    pub fn new(store: Arc<Store>, analytics: Arc<dyn Analytics>) -> Self {
        Self { store, analytics, current: watch::Sender::new(Location::root()) }
    }

    #[must_use]
    pub fn current(&self) -> Location {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.current.subscribe()
    }

    async fn before_each(&self, to: &Location) -> Decision {
        self.store.resolved().await;

        let state = self.store.state();
        let decision = guard::decide(to, state.user());
        if let (Decision::Deny { .. }, Some(user)) = (decision, state.user()) {
            tracing::warn!(to = %to.full_path, email = %user.email, role = %user.highest_role, "route access denied");
            self.store.error_toast(ACCESS_DENIED);
            self.analytics.log_event(AnalyticsEvent::AttemptedAccess {
                to_route: to.full_path.clone(),
                email: user.email.clone(),
                role: user.highest_role,
            });
        }
        decision
    }

    fn after_each(&self, to: &Location, from: &Location) {
        self.analytics.log_event(AnalyticsEvent::RouteChange {
            to_route: to.full_path.clone(),
            from_route: from.full_path.clone(),
        });
    }
}

#[async_trait::async_trait]
impl Navigator for Router {
    async fn push(&self, to: &str) -> Result<Location, NavigationError> {
        let mut target = Location::parse(to);
        for _ in 0..=MAX_REDIRECTS {
            match self.before_each(&target).await {
                Decision::Allow => {
                    let from = self.current.send_replace(target.clone());
                    tracing::debug!(from = %from.full_path, to = %target.full_path, "navigated");
                    self.after_each(&target, &from);
                    return Ok(target);
                }
                Decision::Redirect(path) | Decision::Deny { redirect: path } => {
                    target = Location::parse(path);
                }
            }
        }
        Err(NavigationError::TooManyRedirects { to: to.to_owned(), limit: MAX_REDIRECTS })
    }
}
