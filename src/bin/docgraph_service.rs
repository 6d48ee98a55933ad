//! docgraph Service Binary
//!
//! Serves the GraphQL schema over HTTP:
//! - Structured JSON logging
//! - Access logging keyed by `x-request-id`
//! - Graceful shutdown with explicit store teardown
//! - Health check endpoints
//!
//! ## Configuration
//!
//! Environment variables (a `.env` file is loaded if present):
//! - `PORT`: Service port (default: 4000)
//! - `HOST`: Service host (default: 0.0.0.0)
//! - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
//! - `DATABASE_URL`: PostgreSQL connection string (postgres backend)
//! - `ENGINE_API_KEY`: External reporting key (optional)
//! - `GRAPHQL_DEPTH_LIMIT`: Maximum query depth (optional)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://... cargo run --bin docgraph_service --features service
//! ```

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use docgraph::config::LogFormat;
use docgraph::service::{create_router, metrics_middleware, ServiceState};
use docgraph::{InMemoryDocumentStore, PostgresDocumentStore, ServiceConfig, StoreBackend, StoreHandle};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docgraph=info,docgraph_service=info,tower_http=info,sqlx=warn".into());

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_current_span(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .flatten_event(true),
                )
                .init();
        }
    }
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Caller-supplied request id, or a fresh one. Rejects values that would not
/// round-trip into the response header.
fn request_id(request: &Request) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 128)
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string())
}

/// Access log per request. The request id is echoed back so clients can
/// correlate GraphQL errors with server logs.
async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    let mut response = next.run(request).instrument(span).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if status.is_server_error() {
        warn!(target: "docgraph_service::access", request_id = %request_id, method = %method, path = %path, status = status.as_u16(), latency_ms, "request failed");
    } else {
        info!(target: "docgraph_service::access", request_id = %request_id, method = %method, path = %path, status = status.as_u16(), latency_ms, "request completed");
    }

    response
}

async fn connect_store(backend: StoreBackend) -> Result<StoreHandle, Box<dyn std::error::Error>> {
    match backend {
        StoreBackend::Memory => {
            warn!("Using in-memory document store. Data is lost on restart");
            Ok(StoreHandle::new(InMemoryDocumentStore::new()))
        }
        StoreBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let connect_start = Instant::now();

            let store = match tokio::time::timeout(
                std::time::Duration::from_secs(30),
                PostgresDocumentStore::from_env(),
            )
            .await
            {
                Ok(Ok(store)) => store,
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                    return Err(e.into());
                }
                Err(_) => {
                    tracing::error!("PostgreSQL connection timeout after 30s");
                    return Err("Database connection timeout".into());
                }
            };

            let stats = store.pool_stats();
            info!(
                latency_ms = connect_start.elapsed().as_millis() as u64,
                pool_size = stats.size,
                pool_max = stats.max,
                "PostgreSQL connection established"
            );
            Ok(StoreHandle::new(store))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;
    init_tracing(config.log_format);

    let version = env!("CARGO_PKG_VERSION");
    let build_sha = option_env!("BUILD_SHA").unwrap_or("dev");

    info!(
        version = version,
        build_sha = build_sha,
        config = ?config,
        "Starting docgraph service"
    );

    if config.engine_reporting() {
        info!("ENGINE_API_KEY loaded from environment");
    } else {
        warn!("ENGINE_API_KEY not set; external reporting disabled");
    }

    let store = connect_store(config.backend).await?;
    let state = ServiceState::new(store.clone(), &config)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!(address = %addr, version = version, "docgraph service listening");

    let listener = TcpListener::bind(addr).await?;

    info!("Ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("docgraph service shutdown complete");

    Ok(())
}
