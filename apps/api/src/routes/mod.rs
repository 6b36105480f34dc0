pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::humanize::handlers as humanize_handlers;
use crate::projects::handlers as project_handlers;
use crate::state::AppState;
use crate::users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Humanization lifecycle
        .route("/api/v1/humanize", post(humanize_handlers::handle_humanize))
        // Projects
        .route(
            "/api/v1/projects",
            get(project_handlers::handle_list_projects)
                .post(project_handlers::handle_create_project),
        )
        .route(
            "/api/v1/projects/:id",
            get(project_handlers::handle_get_project)
                .patch(project_handlers::handle_update_project)
                .delete(project_handlers::handle_delete_project),
        )
        // User profiles
        .route("/api/v1/users", post(users::handle_create_user))
        .route(
            "/api/v1/users/:id",
            get(users::handle_get_user).patch(users::handle_update_user),
        )
        .with_state(state)
}
