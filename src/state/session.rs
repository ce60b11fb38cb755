//! The signed-in user as seen by the views.
//!
//! DESIGN
//! ======
//! A session user is folded once, at login, from every authorization record
//! matching the identity's email. It is a snapshot: later changes in the
//! directory are not reflected until the next login.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::roles::Role;
use crate::services::directory::AuthorizationRecord;

/// Authenticated user held by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
    pub highest_role: Role,
    pub sections: Vec<SectionMembership>,
}

/// Attendance counters carried by student memberships.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attendance {
    pub present: i32,
    pub excused: i32,
    pub dishonest: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_attended: Option<OffsetDateTime>,
}

/// A user's membership in one section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionMembership {
    Student { id: Uuid, section: String, attendance: Attendance },
    Staff { id: Uuid, role: Role, section: String },
}

impl SectionMembership {
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            Self::Student { id, .. } | Self::Staff { id, .. } => *id,
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Staff { role, .. } => *role,
        }
    }

    #[must_use]
    pub fn section(&self) -> &str {
        match self {
            Self::Student { section, .. } | Self::Staff { section, .. } => section,
        }
    }

    #[must_use]
    pub fn attendance(&self) -> Option<&Attendance> {
        match self {
            Self::Student { attendance, .. } => Some(attendance),
            Self::Staff { .. } => None,
        }
    }

    /// Membership for one record, or `None` for a student no longer enrolled.
    fn from_record(record: &AuthorizationRecord) -> Option<Self> {
        match record.role {
            Role::Student if !record.enrolled => None,
            Role::Student => Some(Self::Student {
                id: record.id,
                section: record.section.clone(),
                attendance: Attendance {
                    present: record.present,
                    excused: record.excused,
                    dishonest: record.dishonest,
                    last_attended: record.last_attended,
                },
            }),
            role => Some(Self::Staff { id: record.id, role, section: record.section.clone() }),
        }
    }
}

impl SessionUser {
    /// Fold all records for one email into a session user.
    ///
    /// Name and email come from the first record; the role is the highest
    /// found across all of them. Returns `None` when there are no records.
    #[must_use]
    pub fn from_records(records: &[AuthorizationRecord]) -> Option<Self> {
        let first = records.first()?;
        let highest_role = records.iter().map(|r| r.role).max().unwrap_or(Role::Student);
        let sections = records.iter().filter_map(SectionMembership::from_record).collect();

        Some(Self { name: first.name.clone(), email: first.email.clone(), highest_role, sections })
    }
}
