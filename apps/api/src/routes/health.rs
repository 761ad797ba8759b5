use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
/// Static service descriptor.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "name": "JobFlowAI API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health
/// Process status plus the environment name.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "env": state.config.env
    }))
}
