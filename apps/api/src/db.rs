use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Tables owned by the business modules, created idempotently at startup.
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            BIGSERIAL PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name     TEXT,
            created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "password_reset_otps",
        r#"
        CREATE TABLE IF NOT EXISTS password_reset_otps (
            id         BIGSERIAL PRIMARY KEY,
            user_id    BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            otp_hash   TEXT NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL,
            used       BOOLEAN NOT NULL DEFAULT false
        )
        "#,
    ),
    (
        "resumes",
        r#"
        CREATE TABLE IF NOT EXISTS resumes (
            id         BIGSERIAL PRIMARY KEY,
            user_id    BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title      TEXT NOT NULL,
            content    TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "subscriptions",
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            id                     BIGSERIAL PRIMARY KEY,
            user_id                BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            stripe_customer_id     TEXT,
            stripe_subscription_id TEXT,
            plan                   TEXT NOT NULL DEFAULT 'free',
            status                 TEXT NOT NULL DEFAULT 'inactive',
            trial_ends_at          TIMESTAMPTZ,
            updated_at             TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates any missing tables. Must finish before the listener is bound.
pub async fn bootstrap_schema(pool: &PgPool) -> Result<()> {
    for (table, ddl) in SCHEMA {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create table '{table}'"))?;
    }

    info!(tables = SCHEMA.len(), "Database schema ready");
    Ok(())
}
