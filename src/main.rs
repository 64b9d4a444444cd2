use anyhow::Context;
use axum_timesheet::{
    build_router,
    config::Config,
    services::{bootstrap, LedgerStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .init();

    // Open the ledger and provision schema and seed users
    let store = LedgerStore::open(&config.database.path)
        .with_context(|| format!("Failed to open database {}", config.database.path))?;
    bootstrap::initialize(&store, &config.seed.users, config.security.password_cost)
        .context("Failed to initialize database")?;

    let app = build_router(AppState::new(store, config.clone()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on {}", addr);
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
