//! Before-each navigation decision.
//!
//! Pure function of the target and the current user so every branch can be
//! checked without a running store. Side effects of a denial (toast and
//! analytics) are applied by the router.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::table::Location;
use crate::state::session::SessionUser;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
    /// Insufficient role: report, then redirect to the user's own view.
    Deny { redirect: &'static str },
}

/// Decide a navigation to `to` for `user` (auth state already resolved).
#[must_use]
pub fn decide(to: &Location, user: Option<&SessionUser>) -> Decision {
    let meta = to.route().meta;
    match user {
        None if meta.requires_auth => Decision::Redirect("/"),
        Some(user) if to.is_root() => Decision::Redirect(user.highest_role.default_route()),
        Some(user) if meta.requires_auth => match meta.required_role {
            Some(required) if required > user.highest_role => {
                Decision::Deny { redirect: user.highest_role.default_route() }
            }
            _ => Decision::Allow,
        },
        _ => Decision::Allow,
    }
}
