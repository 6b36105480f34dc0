//! User profiles — signup rows, profile edits, and subscription tier
//! changes. Tier changes reset `max_credits` to the plan's allowance;
//! `credits_used` is owned by the credit ledger and never edited here.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{SubscriptionTier, User};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub subscription_tier: Option<SubscriptionTier>,
}

/// POST /api/v1/users
///
/// Creates a profile with signup defaults: free tier, 100 max credits,
/// zero used.
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation(
            "Username must not be empty".to_string(),
        ));
    }

    let taken: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM profiles WHERE username = $1")
        .bind(username)
        .fetch_optional(&state.db)
        .await?;
    if taken.is_some() {
        return Err(AppError::Validation(
            "Username is already taken".to_string(),
        ));
    }

    // The pre-check above races with concurrent signups; the UNIQUE
    // constraint decides the winner and the loser lands here.
    let inserted: Result<User, sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO profiles (username, full_name, avatar_url, credits_used, subscription_tier, max_credits)
        VALUES ($1, $2, $3, 0, 'free', $4)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(&req.full_name)
    .bind(&req.avatar_url)
    .bind(SubscriptionTier::Free.credit_allowance())
    .fetch_one(&state.db)
    .await;

    match inserted {
        Ok(user) => Ok(Json(user)),
        Err(e) if is_unique_violation(&e) => Err(AppError::Validation(
            "Username is already taken".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// True iff the database rejected the statement over a unique constraint.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(e) => matches!(e.kind(), sqlx::error::ErrorKind::UniqueViolation),
        _ => false,
    }
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    user.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
}

/// PATCH /api/v1/users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    // A tier change also moves the credit ceiling to the plan allowance.
    let max_credits = req.subscription_tier.map(SubscriptionTier::credit_allowance);

    let user: Option<User> = sqlx::query_as(
        r#"
        UPDATE profiles
        SET username = COALESCE($2, username),
            full_name = COALESCE($3, full_name),
            avatar_url = COALESCE($4, avatar_url),
            subscription_tier = COALESCE($5, subscription_tier),
            max_credits = COALESCE($6, max_credits)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.username)
    .bind(&req.full_name)
    .bind(&req.avatar_url)
    .bind(req.subscription_tier)
    .bind(max_credits)
    .fetch_optional(&state.db)
    .await?;

    user.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
}
