use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `parsed_resumes` table and its listing index when missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parsed_resumes (
            id              UUID PRIMARY KEY,
            candidate_name  TEXT NOT NULL,
            source_filename TEXT,
            text_chars      INTEGER NOT NULL,
            data            JSONB NOT NULL,
            created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create parsed_resumes table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS parsed_resumes_created_at_idx ON parsed_resumes (created_at DESC)",
    )
    .execute(pool)
    .await
    .context("Failed to create parsed_resumes index")?;

    info!("Database schema ready");
    Ok(())
}
