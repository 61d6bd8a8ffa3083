//! Persistence seam for the round engine.
//!
//! `RoundReconciler` only ever sees `Arc<dyn RoundStore>`; production wires in
//! `PgStore`, tests wire in the in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::job::Job;
use crate::models::round::{Round, RoundResult};
use crate::models::user::Candidate;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Record not found: {0}")]
    Missing(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::Conflict(db.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// Composite identity of a result row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultKey {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub round_name: String,
}

impl ResultKey {
    pub fn new(user_id: Uuid, job_id: Uuid, round_name: &str) -> Self {
        Self {
            user_id,
            job_id,
            round_name: round_name.to_string(),
        }
    }
}

/// Someone who applied to a job, in the order the store lists applications.
#[derive(Debug, Clone)]
pub struct Applicant {
    pub candidate: Candidate,
    pub applied_at: DateTime<Utc>,
}

/// What an upsert did to the row behind a `ResultKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

#[async_trait]
pub trait RoundStore: Send + Sync {
    async fn find_candidate_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Candidate>, StoreError>;

    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError>;

    async fn find_round(&self, job_id: Uuid, round_name: &str)
        -> Result<Option<Round>, StoreError>;

    async fn find_result(&self, key: &ResultKey) -> Result<Option<RoundResult>, StoreError>;

    /// Fails with `StoreError::Conflict` if a row already exists for `key`.
    async fn create_result(
        &self,
        key: &ResultKey,
        round_id: Uuid,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<RoundResult, StoreError>;

    /// Sets status and timestamp. Fails with `StoreError::Missing` if no row exists.
    async fn update_result(
        &self,
        key: &ResultKey,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<RoundResult, StoreError>;

    async fn upsert_result(
        &self,
        key: &ResultKey,
        round_id: Uuid,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<Upserted, StoreError>;

    /// Returns false when there was nothing to delete.
    async fn delete_result(&self, key: &ResultKey) -> Result<bool, StoreError>;

    async fn list_applications(&self, job_id: Uuid) -> Result<Vec<Applicant>, StoreError>;
}
