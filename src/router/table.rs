//! Route table and location parsing.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use serde::Serialize;

use crate::roles::Role;

/// Views the app can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Student,
    Instructor,
    Director,
    NotFound,
}

/// Access requirements attached to a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub required_role: Option<Role>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    pub view: View,
    pub meta: RouteMeta,
}

const fn role_route(path: &'static str, view: View, role: Role) -> RouteDef {
    RouteDef { path, view, meta: RouteMeta { requires_auth: true, required_role: Some(role) } }
}

pub static ROUTES: [RouteDef; 4] = [
    RouteDef { path: "/", view: View::Login, meta: RouteMeta { requires_auth: false, required_role: None } },
    role_route("/student", View::Student, Role::Student),
    role_route("/instructor", View::Instructor, Role::Instructor),
    role_route("/director", View::Director, Role::Director),
];

/// Catch-all for paths not in `ROUTES`.
pub static NOT_FOUND: RouteDef =
    RouteDef { path: "/:path(.*)*", view: View::NotFound, meta: RouteMeta { requires_auth: false, required_role: None } };

/// A navigation target: the matched path plus the full path as requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub full_path: String,
}

impl Location {
    /// Split a requested URL into its path and the full path (with query and
    /// fragment). A missing leading slash is added.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let full_path = if raw.starts_with('/') { raw.to_owned() } else { format!("/{raw}") };
        let end = full_path.find(['?', '#']).unwrap_or(full_path.len());
        Self { path: full_path[..end].to_owned(), full_path }
    }

    #[must_use]
    pub fn root() -> Self {
        Self::parse("/")
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        normalize(&self.path) == "/"
    }

    /// Route matching this location, falling back to `NOT_FOUND`.
    #[must_use]
    pub fn route(&self) -> &'static RouteDef {
        resolve(&self.path)
    }
}

/// Matching ignores case and a trailing slash.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/".to_owned() } else { trimmed.to_ascii_lowercase() }
}

/// Route for a path, or the catch-all.
#[must_use]
pub fn resolve(path: &str) -> &'static RouteDef {
    let wanted = normalize(path);
    ROUTES.iter().find(|r| r.path == wanted).unwrap_or(&NOT_FOUND)
}
