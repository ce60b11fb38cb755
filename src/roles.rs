//! Role hierarchy shared by the store and the navigation guard.
//!
//! DESIGN
//! ======
//! Roles are ordered by privilege so "may this user see that page" is a plain
//! comparison. The integer encoding matches the `role` column of the `users`
//! table.

#[cfg(test)]
#[path = "roles_test.rs"]
mod roles_test;

use serde::{Deserialize, Serialize};

/// Access level of an authorization record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Role {
    Student = 0,
    Instructor = 1,
    Director = 2,
}

/// Raised when a stored role value is outside the known range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown role value {0}")]
pub struct UnknownRole(pub i32);

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Instructor, Role::Director];

    /// Lowercase name used in route paths and analytics event names.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Director => "director",
        }
    }

    /// The view a user lands on after login.
    #[must_use]
    pub fn default_route(self) -> &'static str {
        match self {
            Self::Student => "/student",
            Self::Instructor => "/instructor",
            Self::Director => "/director",
        }
    }
}

impl TryFrom<i32> for Role {
    type Error = UnknownRole;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Student),
            1 => Ok(Self::Instructor),
            2 => Ok(Self::Director),
            other => Err(UnknownRole(other)),
        }
    }
}

impl From<Role> for i32 {
    fn from(role: Role) -> Self {
        role as i32
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
