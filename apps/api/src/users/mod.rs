pub mod handlers;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub country: Option<&'a str>,
    pub resume: Option<&'a str>,
}

/// Inserts a user. A taken username or email surfaces as `AppError::Conflict`.
pub async fn create_user(pool: &PgPool, user: NewUser<'_>) -> Result<User, AppError> {
    let taken: Option<(String,)> =
        sqlx::query_as("SELECT username FROM users WHERE username = $1 OR email = $2 LIMIT 1")
            .bind(user.username)
            .bind(user.email)
            .fetch_optional(pool)
            .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(
            "Username or email already exists".to_string(),
        ));
    }

    let created = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users
            (id, username, email, first_name, last_name, phone_number, city, state, country, resume)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.username)
    .bind(user.email)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.phone_number)
    .bind(user.city)
    .bind(user.state)
    .bind(user.country)
    .bind(user.resume)
    .fetch_one(pool)
    .await?;

    info!("Created user {} ({})", created.id, created.username);
    Ok(created)
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UserChanges {
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

/// Applies `changes` to an existing user. Unknown user is `NotFound`; a username
/// or email held by someone else is `Conflict`.
pub async fn update_user(
    pool: &PgPool,
    user_id: Uuid,
    changes: UserChanges,
) -> Result<User, AppError> {
    if changes.username.is_some() || changes.email.is_some() {
        let taken: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM users WHERE id <> $1 AND (username = $2 OR email = $3) LIMIT 1",
        )
        .bind(user_id)
        .bind(changes.username.as_deref())
        .bind(changes.email.as_deref())
        .fetch_optional(pool)
        .await?;
        if taken.is_some() {
            return Err(AppError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }
    }

    let updated = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            username     = COALESCE($2, username),
            email        = COALESCE($3, email),
            first_name   = COALESCE($4, first_name),
            last_name    = COALESCE($5, last_name),
            phone_number = COALESCE($6, phone_number),
            city         = COALESCE($7, city),
            state        = COALESCE($8, state),
            country      = COALESCE($9, country),
            resume       = COALESCE($10, resume)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(changes.username)
    .bind(changes.email)
    .bind(changes.first_name)
    .bind(changes.last_name)
    .bind(changes.phone_number)
    .bind(changes.city)
    .bind(changes.state)
    .bind(changes.country)
    .bind(changes.resume)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    info!("Updated profile of user {}", updated.id);
    Ok(updated)
}

pub async fn find_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn require_user(pool: &PgPool, user_id: Uuid) -> Result<User, AppError> {
    find_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
