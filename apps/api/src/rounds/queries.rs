use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::round::{JobRoundResultRow, Round, UserRoundResultRow};

/// Inserts a new round. The `(job_id, round_name)` unique constraint rejects duplicates.
pub async fn create_round(
    pool: &PgPool,
    job_id: Uuid,
    round_name: &str,
) -> Result<Round, sqlx::Error> {
    let round = sqlx::query_as::<_, Round>(
        "INSERT INTO rounds (id, job_id, round_name) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(round_name)
    .fetch_one(pool)
    .await?;

    info!("Created round '{}' for job {}", round.round_name, job_id);
    Ok(round)
}

pub async fn list_rounds(pool: &PgPool, job_id: Uuid) -> Result<Vec<Round>, sqlx::Error> {
    Ok(sqlx::query_as::<_, Round>(
        "SELECT * FROM rounds WHERE job_id = $1 ORDER BY created_at ASC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}

/// All of a user's results across jobs, newest first.
pub async fn results_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<UserRoundResultRow>, sqlx::Error> {
    Ok(sqlx::query_as::<_, UserRoundResultRow>(
        r#"
        SELECT r.id, r.user_id, r.job_id, r.round_id, r.round_name, r.status, r.recorded_at,
               j.job_title, j.company_name
        FROM results r
        JOIN jobs j ON j.id = r.job_id
        WHERE r.user_id = $1
        ORDER BY r.recorded_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Every result recorded for a job, grouped by round name, newest first within a round.
pub async fn results_for_job(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<JobRoundResultRow>, sqlx::Error> {
    Ok(sqlx::query_as::<_, JobRoundResultRow>(
        r#"
        SELECT r.id, r.user_id, r.job_id, r.round_id, r.round_name, r.status, r.recorded_at,
               u.username, u.email
        FROM results r
        JOIN users u ON u.id = r.user_id
        WHERE r.job_id = $1
        ORDER BY r.round_name ASC, r.recorded_at DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}
