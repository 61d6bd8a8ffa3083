use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::{self, NewUser, UserChanges};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub resume: Option<String>,
}

impl CreateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_username(&self.username)?;
        validate_email(&self.email)
    }
}

/// Every field optional; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub resume: Option<String>,
}

impl UpdateUserRequest {
    fn into_changes(self) -> Result<UserChanges, AppError> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(UserChanges {
            username: self.username.map(|u| u.trim().to_string()),
            email: self.email.map(|e| e.trim().to_string()),
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            city: self.city,
            state: self.state,
            country: self.country,
            resume: self.resume,
        })
    }
}

fn validate_username(username: &str) -> Result<(), AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("username cannot be empty".to_string()));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "username cannot contain whitespace".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::Validation(format!("'{email}' is not a valid email"))),
    }
}

/// POST /api/v1/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    req.validate()?;

    let user = users::create_user(
        &state.db,
        NewUser {
            username: req.username.trim(),
            email: req.email.trim(),
            first_name: req.first_name.as_deref(),
            last_name: req.last_name.as_deref(),
            phone_number: req.phone_number.as_deref(),
            city: req.city.as_deref(),
            state: req.state.as_deref(),
            country: req.country.as_deref(),
            resume: req.resume.as_deref(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:user_id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    Ok(Json(users::require_user(&state.db, user_id).await?))
}

/// PUT /api/v1/users/:user_id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let changes = req.into_changes()?;
    Ok(Json(users::update_user(&state.db, user_id, changes).await?))
}
