use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::applications::{self, export};
use crate::errors::AppError;
use crate::jobs;
use crate::models::application::{ApplicantRow, JobApplication, MyApplicationRow};
use crate::models::user::Candidate;
use crate::notify::Notice;
use crate::state::AppState;
use crate::users;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub message: String,
    pub application: JobApplication,
}

#[derive(Debug, Serialize)]
pub struct MyApplicationsResponse {
    pub applications: Vec<MyApplicationRow>,
}

#[derive(Debug, Serialize)]
pub struct JobApplicationsResponse {
    pub job_title: String,
    pub applications: Vec<ApplicantRow>,
}

/// POST /api/v1/jobs/:job_id/apply
///
/// The confirmation notice is best-effort; the application stands even if it fails.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    let user = users::require_user(&state.db, req.user_id).await?;
    let job = jobs::require_job(&state.db, job_id).await?;

    if applications::find_application(&state.db, user.id, job.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "You already applied for this job".to_string(),
        ));
    }

    let application = applications::create_application(&state.db, &user, job.id).await?;

    let notice = Notice::application_received(&Candidate::from(&user), &job);
    if let Err(e) = state.notifier.notify(&notice).await {
        warn!(user_id = %user.id, job_id = %job.id, "Application confirmation not sent: {e}");
    }

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            message: "Application submitted".to_string(),
            application,
        }),
    ))
}

/// GET /api/v1/users/:user_id/applications
pub async fn handle_my_applications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MyApplicationsResponse>, AppError> {
    let applications = applications::applications_for_user(&state.db, user_id).await?;
    Ok(Json(MyApplicationsResponse { applications }))
}

/// GET /api/v1/jobs/:job_id/applications
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobApplicationsResponse>, AppError> {
    let job = jobs::require_job(&state.db, job_id).await?;
    let applications = applications::applicants_for_job(&state.db, job_id).await?;
    Ok(Json(JobApplicationsResponse {
        job_title: job.job_title,
        applications,
    }))
}

/// GET /api/v1/jobs/:job_id/applications/export
pub async fn handle_export_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let job = jobs::require_job(&state.db, job_id).await?;
    let rows = applications::applicants_for_job(&state.db, job_id).await?;
    let body = export::render_applicants_csv(&rows)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::export_filename(&job.job_title)
    );
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, body).into_response())
}
