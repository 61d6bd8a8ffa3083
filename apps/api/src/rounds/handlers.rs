use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs;
use crate::models::round::{JobRoundResultRow, Round, UserRoundResultRow};
use crate::rounds::queries;
use crate::rounds::summary::ReconcileSummary;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct QualifyRequest {
    pub job_id: Uuid,
    pub round_name: String,
    #[serde(default)]
    pub qualified_usernames: HashSet<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub job_id: Uuid,
    pub round_name: String,
    pub usernames: Vec<String>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub job_id: Uuid,
    pub round_name: String,
    pub usernames: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoundRequest {
    pub round_name: String,
}

#[derive(Debug, Serialize)]
pub struct UserRoundsResponse {
    pub rounds: Vec<UserRoundResultRow>,
}

#[derive(Debug, Serialize)]
pub struct JobRoundsResponse {
    pub rounds: Vec<JobRoundResultRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Reconciliation
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rounds/results/qualify
pub async fn handle_qualify(
    State(state): State<AppState>,
    Json(req): Json<QualifyRequest>,
) -> Result<Json<ReconcileSummary>, AppError> {
    let summary = state
        .reconciler
        .reconcile_by_set(req.job_id, &req.round_name, &req.qualified_usernames)
        .await?;
    Ok(Json(summary))
}

/// POST /api/v1/rounds/results/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<ReconcileSummary>, AppError> {
    let summary = state
        .reconciler
        .reconcile_by_list(req.job_id, &req.round_name, &req.usernames, &req.status)
        .await?;
    Ok(Json(summary))
}

/// POST /api/v1/rounds/results/delete
pub async fn handle_bulk_delete(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<ReconcileSummary>, AppError> {
    let summary = state
        .reconciler
        .bulk_delete(req.job_id, &req.round_name, &req.usernames)
        .await?;
    Ok(Json(summary))
}

// ────────────────────────────────────────────────────────────────────────────
// Rounds and result reads
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:job_id/rounds
pub async fn handle_create_round(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<CreateRoundRequest>,
) -> Result<(StatusCode, Json<Round>), AppError> {
    let round_name = req.round_name.trim();
    if round_name.is_empty() {
        return Err(AppError::Validation("round_name cannot be empty".to_string()));
    }
    jobs::require_job(&state.db, job_id).await?;

    let round = queries::create_round(&state.db, job_id, round_name).await?;
    Ok((StatusCode::CREATED, Json(round)))
}

/// GET /api/v1/jobs/:job_id/rounds
pub async fn handle_list_rounds(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<Round>>, AppError> {
    jobs::require_job(&state.db, job_id).await?;
    Ok(Json(queries::list_rounds(&state.db, job_id).await?))
}

/// GET /api/v1/rounds/results/user/:user_id
pub async fn handle_user_results(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserRoundsResponse>, AppError> {
    let rounds = queries::results_for_user(&state.db, user_id).await?;
    Ok(Json(UserRoundsResponse { rounds }))
}

/// GET /api/v1/rounds/results/job/:job_id
pub async fn handle_job_results(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRoundsResponse>, AppError> {
    let rounds = queries::results_for_job(&state.db, job_id).await?;
    Ok(Json(JobRoundsResponse { rounds }))
}
