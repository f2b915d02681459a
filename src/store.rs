//! Connection pool and `products` table DDL.

use crate::error::{AppError, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const PRODUCTS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        seller_id INTEGER NOT NULL DEFAULT 0,
        title VARCHAR(80) NOT NULL,
        description VARCHAR(150) NOT NULL,
        highlights JSONB NOT NULL DEFAULT '[]'::jsonb,
        price_ton NUMERIC(18, 6) NOT NULL,
        category VARCHAR(50) NOT NULL,
        images JSONB NOT NULL DEFAULT '[]'::jsonb,
        stock INTEGER NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const PRODUCTS_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_products_active_created ON products (is_active, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_products_category ON products (category)",
];

/// Open the pool. Fails at boot when the database is unreachable.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Create the products table and its indexes if missing. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(PRODUCTS_DDL).execute(pool).await?;
    for ddl in PRODUCTS_INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("products schema ready");
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name.filter(|n| !n.is_empty() && n != "postgres") else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options for the maintenance database plus the target database name.
/// Host, socket and TLS settings carry over from `database_url`.
fn admin_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| ConfigError::Invalid {
        name: "DATABASE_URL",
        reason: e.to_string(),
    })?;
    let db_name = opts.get_database().map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
