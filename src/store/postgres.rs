//! PostgreSQL document store for production use.
//!
//! Documents live in one JSONB table keyed by `(collection, id)`:
//!
//! ```sql
//! CREATE TABLE documents (
//!     collection TEXT NOT NULL,
//!     id TEXT NOT NULL,
//!     body JSONB NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     PRIMARY KEY (collection, id)
//! );
//! ```
//!
//! ## Configuration
//!
//! All settings can be configured via environment variables:
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
//! - `DB_MIN_CONNECTIONS`: Minimum idle connections (default: 2)
//! - `DB_CONNECT_TIMEOUT_SECS`: Connection timeout (default: 10)
//! - `DB_IDLE_TIMEOUT_SECS`: Idle connection timeout (default: 300)
//! - `DB_MAX_LIFETIME_SECS`: Max connection lifetime (default: 1800)

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Row;

use super::{Document, DocumentStore, StoreError};
use crate::types::Collection;

const CREATE_DOCUMENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (collection, id)
    )
"#;

/// Configuration for PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum connections in pool (default: 10).
    pub max_connections: u32,
    /// Minimum idle connections to keep warm (default: 2).
    pub min_connections: u32,
    /// Connection acquire timeout in seconds (default: 10).
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds (default: 300 = 5 min).
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds (default: 1800 = 30 min).
    pub max_lifetime_secs: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Load configuration from environment variables with production defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/docgraph".to_string()),
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            min_connections: env_or("DB_MIN_CONNECTIONS", 2),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", 10),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", 300),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", 1800),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// PostgreSQL document store.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Connect with the given configuration and create the table if needed.
    pub async fn new(config: PostgresConfig) -> Result<Self, StoreError> {
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            connect_timeout_secs = config.connect_timeout_secs,
            idle_timeout_secs = config.idle_timeout_secs,
            max_lifetime_secs = config.max_lifetime_secs,
            "Initializing PostgreSQL connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create a store from environment variables.
    pub async fn from_env() -> Result<Self, StoreError> {
        Self::new(PostgresConfig::from_env()).await
    }

    /// Create the documents table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_DOCUMENTS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Get pool statistics for monitoring.
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            max: self.pool.options().get_max_connections(),
        }
    }

    fn parse_body(collection: Collection, row: &sqlx::postgres::PgRow) -> Result<Document, StoreError> {
        let id: String = row.try_get("id")?;
        let Json(body): Json<Value> = row.try_get("body")?;
        match body {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Malformed {
                collection,
                id,
                reason: format!("stored body is not an object: {}", other),
            }),
        }
    }
}

/// Pool statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolStats {
    /// Current pool size.
    pub size: u32,
    /// Number of idle connections.
    pub idle: usize,
    /// Maximum pool size.
    pub max: u32,
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(|r| Self::parse_body(collection, r))
            .transpose()
    }

    async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(Value::Object(document)))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1
            ORDER BY id
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| Self::parse_body(collection, r))
            .collect()
    }

    async fn find_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body -> $2 = $3
            ORDER BY id
            "#,
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| Self::parse_body(collection, r))
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
