pub mod handlers;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::Job;

/// Fields accepted when creating a job.
pub struct NewJob<'a> {
    pub job_title: &'a str,
    pub company_name: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct JobChanges {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

pub async fn create_job(pool: &PgPool, job: NewJob<'_>) -> Result<Job, sqlx::Error> {
    let job = sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (id, job_title, company_name, description, location)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.job_title)
    .bind(job.company_name)
    .bind(job.description)
    .bind(job.location)
    .fetch_one(pool)
    .await?;

    info!("Created job {} ({})", job.id, job.job_title);
    Ok(job)
}

pub async fn list_jobs(pool: &PgPool) -> Result<Vec<Job>, sqlx::Error> {
    Ok(
        sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn find_job(pool: &PgPool, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    Ok(sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?)
}

/// Loads a job or fails with `AppError::NotFound`.
pub async fn require_job(pool: &PgPool, job_id: Uuid) -> Result<Job, AppError> {
    find_job(pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

pub async fn update_job(
    pool: &PgPool,
    job_id: Uuid,
    changes: JobChanges,
) -> Result<Option<Job>, sqlx::Error> {
    Ok(sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs SET
            job_title    = COALESCE($2, job_title),
            company_name = COALESCE($3, company_name),
            description  = COALESCE($4, description),
            location     = COALESCE($5, location),
            updated_at   = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(changes.job_title)
    .bind(changes.company_name)
    .bind(changes.description)
    .bind(changes.location)
    .fetch_optional(pool)
    .await?)
}

/// Returns false if no such job existed.
pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<bool, sqlx::Error> {
    let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?
        .rows_affected();
    if deleted > 0 {
        info!("Deleted job {job_id}");
    }
    Ok(deleted > 0)
}
