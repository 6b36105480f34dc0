use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::humanize::Humanizer;
use crate::projects::ProjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// The humanization orchestrator, constructed once at startup with its
    /// client, ledger, and store collaborators injected.
    pub humanizer: Arc<Humanizer>,
    /// Project persistence, shared with the orchestrator.
    pub projects: Arc<dyn ProjectStore>,
    pub config: Config,
}
