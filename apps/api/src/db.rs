use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// One connection per expected in-flight humanize request plus CRUD
/// headroom; the ledger's conditional UPDATEs are short, so the pool
/// stays small.
const MAX_CONNECTIONS: u32 = 10;

/// Creates the PostgreSQL pool backing the profiles and projects tables.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL (max {MAX_CONNECTIONS} connections)...");

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    info!("PostgreSQL pool ready (profiles, projects)");
    Ok(pool)
}
