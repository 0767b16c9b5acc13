use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::AppConfig;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            BIGSERIAL PRIMARY KEY,
        name          VARCHAR(40) NOT NULL,
        email         VARCHAR(40) NOT NULL UNIQUE,
        password_hash TEXT        NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id          BIGSERIAL PRIMARY KEY,
        title       VARCHAR(50) NOT NULL,
        description TEXT,
        owner_id    BIGINT      NOT NULL REFERENCES users (id) ON DELETE RESTRICT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS resumes_owner_id_idx ON resumes (owner_id)",
];

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

/// Creates the tables when they are missing. Safe to run on every start.
pub async fn ensure_schema(db: &PgPool) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin schema tx")?;
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .context("ensure schema")?;
    }
    tx.commit().await.context("commit schema tx")?;
    info!("database schema ready");
    Ok(())
}
