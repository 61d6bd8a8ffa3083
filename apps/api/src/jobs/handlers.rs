use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::{self, JobChanges, NewJob};
use crate::models::job::Job;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub job_title: String,
    pub company_name: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job_title = non_blank("job_title", &req.job_title)?;
    let company_name = non_blank("company_name", &req.company_name)?;

    let job = jobs::create_job(
        &state.db,
        NewJob {
            job_title,
            company_name,
            description: req.description.as_deref(),
            location: req.location.as_deref(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(jobs::list_jobs(&state.db).await?))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(jobs::require_job(&state.db, job_id).await?))
}

/// PUT /api/v1/jobs/:job_id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<Job>, AppError> {
    if let Some(title) = &req.job_title {
        non_blank("job_title", title)?;
    }
    if let Some(company) = &req.company_name {
        non_blank("company_name", company)?;
    }

    let changes = JobChanges {
        job_title: req.job_title.map(|t| t.trim().to_string()),
        company_name: req.company_name.map(|c| c.trim().to_string()),
        description: req.description,
        location: req.location,
    };
    jobs::update_job(&state.db, job_id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

/// DELETE /api/v1/jobs/:job_id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if jobs::delete_job(&state.db, job_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Job not found".to_string()))
    }
}

fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank("job_title", "  Engineer ").unwrap(), "Engineer");
    }

    #[test]
    fn test_non_blank_rejects_whitespace() {
        let err = non_blank("company_name", "   ").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "company_name cannot be empty"));
    }
}
