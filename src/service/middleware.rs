//! Service middleware for request metrics.
//!
//! ## Metrics Exposed
//!
//! - `request` - one event per HTTP request with path, method, status, latency
//! - `graphql` - one event per executed GraphQL operation with error count

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// Metrics middleware that records request counts and latency.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "docgraph::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

/// Normalize path for metrics to avoid high cardinality.
///
/// The GraphQL endpoint is reachable at `/` and `/graphql`; both report as
/// `/graphql`. Unknown paths collapse to `other`.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed {
        "" | "/graphql" => "/graphql".to_string(),
        "/health" | "/health/live" | "/health/ready" => trimmed.to_string(),
        _ => "other".to_string(),
    }
}

/// Record an executed GraphQL operation.
pub fn record_graphql_operation(operation: Option<&str>, error_count: usize, latency_ms: u64) {
    info!(
        target: "docgraph::metrics",
        metric_type = "graphql",
        operation = operation.unwrap_or("anonymous"),
        error_count = error_count,
        latency_ms = latency_ms,
        "graphql_metric"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_maps_root_to_graphql() {
        assert_eq!(normalize_path("/"), "/graphql");
        assert_eq!(normalize_path("/graphql/"), "/graphql");
    }

    #[test]
    fn test_normalize_path_preserves_health_paths() {
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
    }

    #[test]
    fn test_normalize_path_collapses_unknown() {
        assert_eq!(normalize_path("/users/u1"), "other");
    }
}
