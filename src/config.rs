//! Service configuration.
//!
//! Read from the process environment after loading an optional `.env` file:
//! - `PORT`: listening port (default: 4000)
//! - `HOST`: bind address (default: 0.0.0.0)
//! - `STORE_BACKEND`: `memory` or `postgres` (default: postgres)
//! - `ENGINE_API_KEY`: external reporting key (optional, never logged)
//! - `GRAPHQL_DEPTH_LIMIT`: maximum query depth (optional)
//! - `LOG_FORMAT`: `json` or `pretty` (default: json)

use crate::graphql::SchemaOptions;

/// Which document store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local, lost on restart.
    Memory,
    /// PostgreSQL JSONB documents.
    Postgres,
}

impl StoreBackend {
    /// Parse a backend name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Some(Self::Memory),
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines.
    Json,
    /// Human-readable output for local development.
    Pretty,
}

/// Error loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set to an unparseable value.
    #[error("Invalid value for {key}: {value}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Service configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Document store backend.
    pub backend: StoreBackend,
    /// External reporting API key.
    pub engine_api_key: Option<String>,
    /// Optional query depth limit.
    pub depth_limit: Option<usize>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            backend: StoreBackend::Postgres,
            engine_api_key: None,
            depth_limit: None,
            log_format: LogFormat::Json,
        }
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("backend", &self.backend)
            .field("engine_api_key", &self.engine_api_key.as_ref().map(|_| "<redacted>"))
            .field("depth_limit", &self.depth_limit)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ServiceConfig {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal production case.
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: v })?,
            None => defaults.port,
        };

        let backend = match get("STORE_BACKEND") {
            Some(v) => StoreBackend::from_str(&v).ok_or(ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: v,
            })?,
            None => defaults.backend,
        };

        let depth_limit = match get("GRAPHQL_DEPTH_LIMIT") {
            Some(v) => Some(v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "GRAPHQL_DEPTH_LIMIT",
                value: v,
            })?),
            None => None,
        };

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            backend,
            engine_api_key: get("ENGINE_API_KEY"),
            depth_limit,
            log_format,
        })
    }

    /// `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether an external reporting key was supplied.
    pub fn engine_reporting(&self) -> bool {
        self.engine_api_key.is_some()
    }

    /// Options for [`crate::graphql::build_schema`].
    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions {
            depth_limit: self.depth_limit,
        }
    }
}
