//! Request gate: decides per request whether a credential must verify
//! before the handler runs.
//!
//! The gate is either `Disabled` or `Enabled`, chosen once at startup and
//! fixed for the process lifetime. When enabled, a request needs a valid
//! bearer token unless its path is in the [`ExclusionSet`] (exact match).

pub mod exclusions;
pub mod middleware;
pub mod verifier;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

pub use exclusions::ExclusionSet;
pub use middleware::{log_request, require_credential};
pub use verifier::{Identity, JwtVerifier, TokenVerifier};

#[derive(Debug, Error)]
pub enum GateInitError {
    #[error("JWT_SECRET_KEY is not set; tokens cannot be verified")]
    MissingSecret,
}

/// Startup snapshot of the gate settings.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub enabled: bool,
    pub exclusions: ExclusionSet,
    pub verify_timeout: Duration,
}

impl GateConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.use_auth_middleware,
            exclusions: ExclusionSet::default(),
            verify_timeout: config.auth_verify_timeout,
        }
    }
}

#[derive(Clone)]
pub enum AuthGate {
    Disabled,
    Enabled(Arc<EnabledGate>),
}

pub struct EnabledGate {
    pub exclusions: ExclusionSet,
    pub verifier: Arc<dyn TokenVerifier>,
    pub verify_timeout: Duration,
}

impl AuthGate {
    /// Builds the gate from its settings. A disabled config never touches the verifier.
    pub fn new(config: GateConfig, verifier: Arc<dyn TokenVerifier>) -> Self {
        if !config.enabled {
            return AuthGate::Disabled;
        }
        AuthGate::Enabled(Arc::new(EnabledGate {
            exclusions: config.exclusions,
            verifier,
            verify_timeout: config.verify_timeout,
        }))
    }

    /// `true` iff the gate is enabled and `path` is not excluded.
    pub fn requires_auth(&self, path: &str) -> bool {
        match self {
            AuthGate::Disabled => false,
            AuthGate::Enabled(gate) => !gate.exclusions.contains(path),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AuthGate::Enabled(_))
    }
}

/// Initialises the gate from configuration.
///
/// With `USE_AUTH_MIDDLEWARE` off this is always `Disabled`. With it on, a
/// verifier that cannot be built is an error unless `AUTH_FAIL_OPEN=true`,
/// in which case the gate is disabled and a warning is logged.
pub fn init_gate(config: &Config) -> Result<AuthGate, GateInitError> {
    let gate_config = GateConfig::from_config(config);

    if !gate_config.enabled {
        info!("Auth gate disabled (USE_AUTH_MIDDLEWARE=false)");
        return Ok(AuthGate::Disabled);
    }

    let verifier = config
        .jwt_secret_key
        .as_deref()
        .ok_or(GateInitError::MissingSecret)
        .and_then(JwtVerifier::hs256);

    match verifier {
        Ok(verifier) => {
            info!(
                excluded_paths = gate_config.exclusions.len(),
                verify_timeout_ms = gate_config.verify_timeout.as_millis() as u64,
                "Auth gate enabled (USE_AUTH_MIDDLEWARE=true)"
            );
            Ok(AuthGate::new(gate_config, Arc::new(verifier)))
        }
        Err(e) if config.auth_fail_open => {
            warn!(
                "Auth gate NOT mounted, all routes are unauthenticated (AUTH_FAIL_OPEN=true): {e}"
            );
            Ok(AuthGate::Disabled)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let mut all = vec![("DATABASE_URL", "postgres://localhost/jobflow")];
        all.extend_from_slice(pairs);
        Config::from_lookup(|key| {
            all.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_disabled_by_default() {
        let gate = init_gate(&config(&[])).unwrap();
        assert!(!gate.is_enabled());
        assert!(!gate.requires_auth("/api/v1/profile"));
    }

    #[test]
    fn test_enabled_with_secret() {
        let gate = init_gate(&config(&[
            ("USE_AUTH_MIDDLEWARE", "true"),
            ("JWT_SECRET_KEY", "s3cret"),
        ]))
        .unwrap();
        assert!(gate.is_enabled());
        assert!(gate.requires_auth("/api/v1/profile"));
        assert!(gate.requires_auth("/api/v1/resume-cover/save"));
        assert!(!gate.requires_auth("/api/v1/resume-cover"));
        assert!(!gate.requires_auth("/health"));
    }

    #[test]
    fn test_missing_secret_fails_closed() {
        let result = init_gate(&config(&[("USE_AUTH_MIDDLEWARE", "true")]));
        assert!(matches!(result, Err(GateInitError::MissingSecret)));
    }

    #[test]
    fn test_missing_secret_fail_open_disables() {
        let gate = init_gate(&config(&[
            ("USE_AUTH_MIDDLEWARE", "true"),
            ("AUTH_FAIL_OPEN", "true"),
        ]))
        .unwrap();
        assert!(!gate.is_enabled());
    }
}
