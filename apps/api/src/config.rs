use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

/// Origins allowed when `ALLOWED_ORIGINS` is unset: local dev and preview servers.
pub const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:4173",
    "http://127.0.0.1:4173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:3001",
    "http://127.0.0.1:3001",
];

const DEFAULT_VERIFY_TIMEOUT_MS: u64 = 5_000;

/// Application configuration loaded once from environment variables.
/// Nothing downstream reads the environment again.
#[derive(Clone)]
pub struct Config {
    /// Lower-cased deployment name (`dev`, `staging`, `prod`, ...).
    pub env: String,
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub auto_migrate: bool,
    pub allowed_origins: Vec<String>,
    pub use_auth_middleware: bool,
    /// Run unprotected (with a warning) instead of aborting when the auth gate cannot start.
    pub auth_fail_open: bool,
    pub auth_verify_timeout: Duration,
    pub jwt_secret_key: Option<String>,
    pub enable_jobs_debug: bool,
    pub integrations: IntegrationKeys,
}

/// Third-party credentials consumed by the business modules.
/// Only their presence is ever logged.
#[derive(Clone, Default)]
pub struct IntegrationKeys {
    pub rapidapi_key: Option<String>,
    pub jsearch_host: Option<String>,
    pub jsearch_path: Option<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_price_pro_month: Option<String>,
    pub stripe_price_pro_year: Option<String>,
    pub stripe_webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag = |key: &str| var(key).map(|v| parse_flag(&v)).unwrap_or(false);

        let auth_verify_timeout = match var("AUTH_VERIFY_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("AUTH_VERIFY_TIMEOUT_MS must be a number of milliseconds, got '{raw}'"))?,
            None => DEFAULT_VERIFY_TIMEOUT_MS,
        };

        Ok(Config {
            env: var("ENV")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or_else(|| "dev".to_string()),
            database_url: var("DATABASE_URL")
                .context("Required environment variable 'DATABASE_URL' is not set")?,
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            auto_migrate: flag("AUTO_MIGRATE"),
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .filter(|origins| !origins.is_empty())
                .unwrap_or_else(|| DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect()),
            use_auth_middleware: flag("USE_AUTH_MIDDLEWARE"),
            auth_fail_open: flag("AUTH_FAIL_OPEN"),
            auth_verify_timeout: Duration::from_millis(auth_verify_timeout),
            jwt_secret_key: var("JWT_SECRET_KEY"),
            enable_jobs_debug: flag("ENABLE_JOBS_DEBUG"),
            integrations: IntegrationKeys {
                rapidapi_key: var("RAPIDAPI_KEY"),
                jsearch_host: var("JSEARCH_RAPIDAPI_HOST"),
                jsearch_path: var("JSEARCH_RAPIDAPI_PATH"),
                stripe_secret_key: var("STRIPE_SECRET_KEY"),
                stripe_price_pro_month: var("STRIPE_PRICE_PRO_MONTH"),
                stripe_price_pro_year: var("STRIPE_PRICE_PRO_YEAR"),
                stripe_webhook_secret: var("STRIPE_WEBHOOK_SECRET"),
            },
        })
    }

    /// Tables are created at startup in dev, or anywhere when AUTO_MIGRATE=true.
    pub fn should_bootstrap_schema(&self) -> bool {
        self.env == "dev" || self.auto_migrate
    }

    /// Logs the effective startup configuration without revealing secrets.
    pub fn log_summary(&self) {
        let keys = &self.integrations;
        info!(
            env = %self.env,
            auto_migrate = self.auto_migrate,
            use_auth_middleware = self.use_auth_middleware,
            allowed_origins = ?self.allowed_origins,
            "Configuration loaded"
        );
        info!(
            rapidapi_key = keys.rapidapi_key.is_some(),
            jsearch_host = keys.jsearch_host.as_deref().unwrap_or("-"),
            jsearch_path = keys.jsearch_path.as_deref().unwrap_or("-"),
            "Job search integration"
        );
        info!(
            secret_key = keys.stripe_secret_key.is_some(),
            price_pro_month = keys.stripe_price_pro_month.is_some(),
            price_pro_year = keys.stripe_price_pro_year.is_some(),
            webhook_secret = keys.stripe_webhook_secret.is_some(),
            "Stripe keys present"
        );
    }
}

/// Toggles are on only for a literal `true`, case-insensitive.
fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://x/db")])).unwrap();
        assert_eq!(config.env, "dev");
        assert_eq!(config.port, 8080);
        assert!(!config.use_auth_middleware);
        assert!(!config.auth_fail_open);
        assert!(!config.auto_migrate);
        assert_eq!(config.auth_verify_timeout, Duration::from_secs(5));
        assert_eq!(config.allowed_origins.len(), DEFAULT_ORIGINS.len());
        assert!(config.jwt_secret_key.is_none());
    }

    #[test]
    fn test_missing_database_url_is_error() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_flags_only_accept_true() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x/db"),
            ("USE_AUTH_MIDDLEWARE", " TRUE "),
            ("AUTO_MIGRATE", "1"),
            ("AUTH_FAIL_OPEN", "yes"),
        ]))
        .unwrap();
        assert!(config.use_auth_middleware);
        assert!(!config.auto_migrate);
        assert!(!config.auth_fail_open);
    }

    #[test]
    fn test_allowed_origins_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x/db"),
            ("ALLOWED_ORIGINS", "https://app.example.com/, https://www.example.com,,"),
        ]))
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://app.example.com", "https://www.example.com"]
        );
    }

    #[test]
    fn test_blank_origins_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x/db"),
            ("ALLOWED_ORIGINS", " , "),
        ]))
        .unwrap();
        assert_eq!(config.allowed_origins[0], "http://localhost:5173");
    }

    #[test]
    fn test_invalid_port_is_error() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x/db"),
            ("PORT", "eighty"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_bootstrap_rules() {
        let dev = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://x/db")])).unwrap();
        assert!(dev.should_bootstrap_schema());

        let prod = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x/db"),
            ("ENV", "Prod"),
        ]))
        .unwrap();
        assert_eq!(prod.env, "prod");
        assert!(!prod.should_bootstrap_schema());

        let migrating = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x/db"),
            ("ENV", "prod"),
            ("AUTO_MIGRATE", "true"),
        ]))
        .unwrap();
        assert!(migrating.should_bootstrap_schema());
    }
}
