//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written only by the store; read by the navigation guard and the view
//! layer to coordinate redirects and identity-dependent rendering.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::Serialize;

use super::session::SessionUser;

/// The user slot of the auth state.
///
/// `Unresolved` only exists until the first identity notification has been
/// handled; after that the slot is always `Anonymous` or `SignedIn`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum UserSlot {
    #[default]
    Unresolved,
    Anonymous,
    SignedIn(SessionUser),
}

impl UserSlot {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Unresolved | Self::Anonymous => None,
        }
    }
}

impl From<Option<SessionUser>> for UserSlot {
    fn from(user: Option<SessionUser>) -> Self {
        user.map_or(Self::Anonymous, Self::SignedIn)
    }
}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub loading: bool,
    pub user: UserSlot,
}

impl Default for AuthState {
    /// Loading until the first auth-state resolution.
    fn default() -> Self {
        Self { loading: true, user: UserSlot::Unresolved }
    }
}

impl AuthState {
    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.user()
    }
}
