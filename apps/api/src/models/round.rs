use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named interview stage of a job. `(job_id, round_name)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Round {
    pub id: Uuid,
    pub job_id: Uuid,
    pub round_name: String,
    pub created_at: DateTime<Utc>,
}

/// One candidate's outcome in one round of one job.
/// At most one row exists per `(user_id, job_id, round_name)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoundResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub round_id: Uuid,
    pub round_name: String,
    pub status: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRoundResultRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub result: RoundResult,
    pub job_title: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRoundResultRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub result: RoundResult,
    pub username: String,
    pub email: String,
}
