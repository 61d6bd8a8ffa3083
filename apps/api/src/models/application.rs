use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const APPLICATION_PENDING: &str = "Pending";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub resume: Option<String>,
    pub status: String,
    pub current_round: i32,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MyApplicationRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: JobApplication,
    pub job_title: String,
    pub company_name: String,
}

/// An application joined with the applicant's profile, as listed and exported per job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantRow {
    pub application_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub resume: Option<String>,
    pub status: String,
    pub current_round: i32,
    pub applied_at: DateTime<Utc>,
}
