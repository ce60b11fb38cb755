//! Analytics events emitted by the store and router.
//!
//! Events are fire-and-forget: sinks never report back and never fail the
//! action that emitted them. The default sink writes structured log lines.

#[cfg(test)]
#[path = "analytics_test.rs"]
mod analytics_test;

use serde::Serialize;

use crate::roles::Role;

/// A single analytics event with its contextual parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsEvent {
    AttemptedAccess { to_route: String, email: String, role: Role },
    RouteChange { to_route: String, from_route: String },
    NonInstitutionalEmail { email: String },
    UnauthorizedUser { email: String },
    Login { role: Role, email: String },
}

impl AnalyticsEvent {
    /// Wire name of the event.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::AttemptedAccess { .. } => "attempted_access".to_owned(),
            Self::RouteChange { .. } => "route_change".to_owned(),
            Self::NonInstitutionalEmail { .. } => "non_miami_email".to_owned(),
            Self::UnauthorizedUser { .. } => "unauthorized_user".to_owned(),
            Self::Login { role, .. } => format!("{}_login", role.name()),
        }
    }

    /// Event parameters as a JSON object.
    #[must_use]
    pub fn params(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        // The role is already part of a login event's name.
        if let (Self::Login { .. }, Some(obj)) = (self, value.as_object_mut()) {
            obj.remove("role");
        }
        value
    }
}

/// Sink for analytics events.
pub trait Analytics: Send + Sync {
    fn log_event(&self, event: AnalyticsEvent);
}

/// Logs every event under the `analytics` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn log_event(&self, event: AnalyticsEvent) {
        tracing::info!(target: "analytics", event = %event.name(), params = %event.params(), "analytics event");
    }
}
