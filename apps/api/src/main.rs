mod config;
mod cors;
mod db;
mod errors;
mod gate;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{bootstrap_schema, create_pool};
use crate::gate::init_gate;
use crate::routes::build_app;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; the environment is not read again after this
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFlowAI API v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Schema must be ready (or deliberately skipped) before we accept traffic
    if config.should_bootstrap_schema() {
        bootstrap_schema(&db).await?;
    } else {
        info!(env = %config.env, "Schema bootstrap skipped (AUTO_MIGRATE=false)");
    }

    // Fails startup unless AUTH_FAIL_OPEN=true explicitly allows running unprotected
    let gate = init_gate(&config).context(
        "Auth gate failed to initialise; set JWT_SECRET_KEY or AUTH_FAIL_OPEN=true",
    )?;
    if config.env == "prod" && !gate.is_enabled() {
        warn!("Running in prod with the auth gate disabled");
    }

    let state = AppState {
        db,
        config: config.clone(),
    };

    let app = build_app(state, gate)?;

    info!("=== ROUTES ===");
    for route in &app.routes {
        info!("{:<7} {:<35} -> {}", route.method.as_str(), route.path, route.module);
    }

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.router).await?;

    Ok(())
}
