// Job applications: applying, listing per user and per job, and CSV export.

pub mod export;
pub mod handlers;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{
    ApplicantRow, JobApplication, MyApplicationRow, APPLICATION_PENDING,
};
use crate::models::user::User;

pub async fn find_application(
    pool: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<Option<JobApplication>, sqlx::Error> {
    Ok(sqlx::query_as::<_, JobApplication>(
        "SELECT * FROM job_applications WHERE user_id = $1 AND job_id = $2",
    )
    .bind(user_id)
    .bind(job_id)
    .fetch_optional(pool)
    .await?)
}

/// New applications start in round 1 as "Pending" with the user's current resume.
pub async fn create_application(
    pool: &PgPool,
    user: &User,
    job_id: Uuid,
) -> Result<JobApplication, sqlx::Error> {
    let application = sqlx::query_as::<_, JobApplication>(
        r#"
        INSERT INTO job_applications (id, user_id, job_id, resume, status, current_round)
        VALUES ($1, $2, $3, $4, $5, 1)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(job_id)
    .bind(user.resume.as_deref())
    .bind(APPLICATION_PENDING)
    .fetch_one(pool)
    .await?;

    info!("User {} applied to job {}", user.id, job_id);
    Ok(application)
}

pub async fn applications_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<MyApplicationRow>, sqlx::Error> {
    Ok(sqlx::query_as::<_, MyApplicationRow>(
        r#"
        SELECT a.id, a.user_id, a.job_id, a.resume, a.status, a.current_round, a.applied_at,
               j.job_title, j.company_name
        FROM job_applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.user_id = $1
        ORDER BY a.applied_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn applicants_for_job(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<ApplicantRow>, sqlx::Error> {
    Ok(sqlx::query_as::<_, ApplicantRow>(
        r#"
        SELECT a.id AS application_id, u.id AS user_id, u.username, u.email,
               u.first_name, u.last_name, u.phone_number, u.city, u.state, u.country,
               a.resume, a.status, a.current_round, a.applied_at
        FROM job_applications a
        JOIN users u ON u.id = a.user_id
        WHERE a.job_id = $1
        ORDER BY a.applied_at DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}
