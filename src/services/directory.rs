//! Authorization directory: who may use the app, and in which role.
//!
//! ARCHITECTURE
//! ============
//! The store only sees the `Directory` trait. `PgDirectory` backs it with the
//! `users` table; one row exists per (person, section, role) assignment, so a
//! single email can match several rows.

#[cfg(test)]
#[path = "directory_test.rs"]
mod directory_test;

use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::roles::{Role, UnknownRole};

/// One row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub section: String,
    pub enrolled: bool,
    pub present: i32,
    pub excused: i32,
    pub dishonest: i32,
    pub last_attended: Option<OffsetDateTime>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("record {id} has invalid role: {source}")]
    InvalidRole { id: Uuid, source: UnknownRole },
}

/// Lookup of authorization records by email.
#[async_trait::async_trait]
pub trait Directory: Send + Sync {
    /// All records whose email matches exactly (case-sensitive), oldest first.
    async fn records_for_email(&self, email: &str) -> Result<Vec<AuthorizationRecord>, DirectoryError>;
}

/// `Directory` over the Postgres `users` table.
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Directory for PgDirectory {
    async fn records_for_email(&self, email: &str) -> Result<Vec<AuthorizationRecord>, DirectoryError> {
        let rows = sqlx::query(
            r"SELECT id, name, email, role, section, enrolled, present, excused, dishonest, last_attended
              FROM users
              WHERE email = $1
              ORDER BY created_at, id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| -> Result<AuthorizationRecord, DirectoryError> {
                let id: Uuid = r.try_get("id")?;
                let role = Role::try_from(r.try_get::<i32, _>("role")?)
                    .map_err(|source| DirectoryError::InvalidRole { id, source })?;
                Ok(AuthorizationRecord {
                    id,
                    name: r.try_get("name")?,
                    email: r.try_get("email")?,
                    role,
                    section: r.try_get("section")?,
                    enrolled: r.try_get("enrolled")?,
                    present: r.try_get("present")?,
                    excused: r.try_get("excused")?,
                    dishonest: r.try_get("dishonest")?,
                    last_attended: r.try_get("last_attended")?,
                })
            })
            .collect()
    }
}
