//! Application wiring: store, router, and the identity listener.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` is what the HTTP layer holds. It owns the store and router, binds
//! the router as the store's navigator, and forwards identity-provider
//! notifications to `Store::auth_state_changed` one at a time.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::router::{Navigator, Router};
use crate::services::analytics::Analytics;
use crate::services::directory::Directory;
use crate::services::identity::IdentityProvider;
use crate::services::toast::ToastQueue;
use crate::store::{AccessPolicy, Store};

/// Shared app handle. Clone is cheap; all fields are `Arc`s.
#[derive(Clone)]
pub struct App {
    pub store: Arc<Store>,
    pub router: Arc<Router>,
    pub identity: Arc<dyn IdentityProvider>,
    pub toasts: Arc<ToastQueue>,
}

impl App {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        directory: Arc<dyn Directory>,
        analytics: Arc<dyn Analytics>,
        policy: AccessPolicy,
    ) -> Self {
        let toasts = Arc::new(ToastQueue::new());
        let store = Arc::new(Store::new(identity.clone(), directory, analytics.clone(), toasts.clone(), policy));
        let router = Arc::new(Router::new(store.clone(), analytics));

        let navigator: Arc<dyn Navigator> = router.clone();
        store.attach_navigator(Arc::downgrade(&navigator));

        Self { store, router, identity, toasts }
    }

    /// Spawn the task feeding identity notifications to the store.
    ///
    /// The identity current at subscription time is delivered first, which
    /// resolves the auth state. The task ends when the provider is dropped.
    pub fn spawn_auth_listener(&self) -> JoinHandle<()> {
        let mut rx = self.identity.subscribe();
        let store = self.store.clone();
        tokio::spawn(async move {
            loop {
                let identity = rx.borrow_and_update().clone();
                tracing::debug!(signed_in = identity.is_some(), "auth state changed");
                store.auth_state_changed(identity).await;
                if rx.changed().await.is_err() {
                    tracing::info!("identity provider closed; auth listener stopping");
                    break;
                }
            }
        })
    }
}
