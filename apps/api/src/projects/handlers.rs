use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::ProjectRow;
use crate::projects::ProjectPatch;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
}

/// GET /api/v1/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    let projects = state.projects.list(params.user_id).await?;
    Ok(Json(projects))
}

/// POST /api/v1/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<ProjectRow>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".to_string()));
    }
    let project = state
        .projects
        .create(req.user_id, &req.title, &req.content)
        .await?;
    Ok(Json(project))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectRow>, AppError> {
    let project = state.projects.get(id).await?;
    Ok(Json(project))
}

/// PATCH /api/v1/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<ProjectRow>, AppError> {
    let project = state.projects.update(id, &patch).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.projects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
