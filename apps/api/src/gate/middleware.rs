use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, info, instrument, warn};

use super::AuthGate;
use crate::errors::AppError;

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Auth gate middleware.
///
/// Passes the request through when the gate is disabled or the path is
/// excluded. Otherwise the bearer token must verify within the configured
/// timeout; the resulting [`Identity`](super::Identity) is stored in the
/// request extensions. Any failure is a 401 with the same generic body, and
/// the handler never runs.
#[instrument(skip_all, name = "gate.require_credential")]
pub async fn require_credential(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let gate = match &gate {
        AuthGate::Enabled(inner) if gate.requires_auth(req.uri().path()) => inner.clone(),
        _ => return Ok(next.run(req).await),
    };

    let token = bearer_token(req.headers())
        .ok_or_else(|| {
            debug!(path = %req.uri().path(), "Missing or malformed bearer token");
            AppError::Unauthorized
        })?
        .to_owned();

    let identity = match tokio::time::timeout(gate.verify_timeout, gate.verifier.verify(&token)).await
    {
        Ok(Ok(identity)) => identity,
        Ok(Err(e)) => {
            debug!(path = %req.uri().path(), error = %e, "Credential rejected");
            return Err(AppError::Unauthorized);
        }
        Err(_) => {
            warn!(
                path = %req.uri().path(),
                timeout_ms = gate.verify_timeout.as_millis() as u64,
                "Credential verification timed out"
            );
            return Err(AppError::Unauthorized);
        }
    };

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Diagnostic tap: logs method, path and whether an Authorization header is present.
/// Header presence says nothing about validity and never affects routing.
pub async fn log_request(req: Request, next: Next) -> Response {
    let auth_present = req
        .headers()
        .get(AUTHORIZATION)
        .is_some_and(|h| !h.is_empty());
    info!(method = %req.method(), path = %req.uri().path(), auth_present, "REQ");

    next.run(req).await
}
