mod config;
mod credits;
mod db;
mod errors;
mod humanize;
mod humanizer;
mod models;
mod projects;
mod routes;
mod state;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credits::PgCreditLedger;
use crate::db::create_pool;
use crate::humanize::Humanizer;
use crate::humanizer::poll::PollPolicy;
use crate::humanizer::UndetectableClient;
use crate::projects::{PgProjectStore, ProjectStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Humanizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize the remote humanization client
    let api = Arc::new(UndetectableClient::new(
        config.humanizer_api_url.clone(),
        config.humanizer_api_key.clone(),
    ));
    info!("Humanizer client initialized (model: {})", humanizer::MODEL);

    // Wire the orchestrator with its collaborators
    let ledger = Arc::new(PgCreditLedger::new(db.clone()));
    let projects: Arc<dyn ProjectStore> = Arc::new(PgProjectStore::new(db.clone()));
    let humanizer = Arc::new(Humanizer::new(
        api,
        ledger,
        projects.clone(),
        PollPolicy::default(),
    ));

    // Build app state
    let state = AppState {
        db,
        humanizer,
        projects,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
