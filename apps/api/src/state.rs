use sqlx::PgPool;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pool handed to the business modules; the composition root only bootstraps the schema with it.
    #[allow(dead_code)]
    pub db: PgPool,
    pub config: Config,
}
