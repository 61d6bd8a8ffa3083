use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Applicant, ResultKey, RoundStore, StoreError, Upserted};
use crate::models::job::Job;
use crate::models::round::{Round, RoundResult};
use crate::models::user::Candidate;

const RESULT_COLUMNS: &str = "id, user_id, job_id, round_id, round_name, status, recorded_at";

/// `RoundStore` over the shared PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ApplicantRecord {
    #[sqlx(flatten)]
    candidate: Candidate,
    applied_at: DateTime<Utc>,
}

#[async_trait]
impl RoundStore for PgStore {
    async fn find_candidate_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Candidate>, StoreError> {
        Ok(sqlx::query_as::<_, Candidate>(
            "SELECT id, username, email, first_name, last_name FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_round(
        &self,
        job_id: Uuid,
        round_name: &str,
    ) -> Result<Option<Round>, StoreError> {
        Ok(sqlx::query_as::<_, Round>(
            "SELECT * FROM rounds WHERE job_id = $1 AND round_name = $2",
        )
        .bind(job_id)
        .bind(round_name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_result(&self, key: &ResultKey) -> Result<Option<RoundResult>, StoreError> {
        Ok(sqlx::query_as::<_, RoundResult>(&format!(
            "SELECT {RESULT_COLUMNS} FROM results \
             WHERE user_id = $1 AND job_id = $2 AND round_name = $3"
        ))
        .bind(key.user_id)
        .bind(key.job_id)
        .bind(&key.round_name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_result(
        &self,
        key: &ResultKey,
        round_id: Uuid,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<RoundResult, StoreError> {
        Ok(sqlx::query_as::<_, RoundResult>(&format!(
            "INSERT INTO results ({RESULT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {RESULT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(key.user_id)
        .bind(key.job_id)
        .bind(round_id)
        .bind(&key.round_name)
        .bind(status)
        .bind(at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_result(
        &self,
        key: &ResultKey,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<RoundResult, StoreError> {
        sqlx::query_as::<_, RoundResult>(&format!(
            "UPDATE results SET status = $4, recorded_at = $5 \
             WHERE user_id = $1 AND job_id = $2 AND round_name = $3 \
             RETURNING {RESULT_COLUMNS}"
        ))
        .bind(key.user_id)
        .bind(key.job_id)
        .bind(&key.round_name)
        .bind(status)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            StoreError::Missing(format!(
                "result for user {} in round '{}'",
                key.user_id, key.round_name
            ))
        })
    }

    async fn upsert_result(
        &self,
        key: &ResultKey,
        round_id: Uuid,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<Upserted, StoreError> {
        // xmax is zero only for a freshly inserted tuple.
        let inserted = sqlx::query_scalar::<_, bool>(&format!(
            r#"
            INSERT INTO results ({RESULT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, job_id, round_name)
            DO UPDATE SET status = EXCLUDED.status,
                          recorded_at = EXCLUDED.recorded_at,
                          round_id = EXCLUDED.round_id
            RETURNING (xmax = 0) AS inserted
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(key.user_id)
        .bind(key.job_id)
        .bind(round_id)
        .bind(&key.round_name)
        .bind(status)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(if inserted {
            Upserted::Created
        } else {
            Upserted::Updated
        })
    }

    async fn delete_result(&self, key: &ResultKey) -> Result<bool, StoreError> {
        let deleted = sqlx::query(
            "DELETE FROM results WHERE user_id = $1 AND job_id = $2 AND round_name = $3",
        )
        .bind(key.user_id)
        .bind(key.job_id)
        .bind(&key.round_name)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(deleted > 0)
    }

    async fn list_applications(&self, job_id: Uuid) -> Result<Vec<Applicant>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicantRecord>(
            r#"
            SELECT u.id, u.username, u.email, u.first_name, u.last_name, a.applied_at
            FROM job_applications a
            JOIN users u ON u.id = a.user_id
            WHERE a.job_id = $1
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Applicant {
                candidate: row.candidate,
                applied_at: row.applied_at,
            })
            .collect())
    }
}
