//! Axum routes for the GraphQL service.

use std::sync::Arc;
use std::time::Instant;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::middleware::record_graphql_operation;
use super::state::ServiceState;
use crate::DOCGRAPH_SCHEMA_VERSION;

/// Type alias for the shared state handed to handlers.
pub type AppState = Arc<ServiceState>;

// ============================================================================
// Response Types
// ============================================================================

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub schema_version: String,
    /// Document store backend name.
    pub backend: String,
    /// Whether the store answered a ping.
    pub store_connected: bool,
    /// Whether an external reporting key is configured.
    pub engine_reporting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness response with dependency status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub store: bool,
    pub details: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Execute a GraphQL operation.
async fn graphql_handler(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
    let request = request.into_inner();
    let operation = request.operation_name.clone();
    let start = Instant::now();

    let response = state.schema.execute(request).await;

    record_graphql_operation(
        operation.as_deref(),
        response.errors.len(),
        start.elapsed().as_millis() as u64,
    );
    response.into()
}

/// GraphiQL page for interactive exploration.
async fn graphiql_handler() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let ping = state.store.ping().await;

    Json(HealthResponse {
        status: if ping.is_ok() { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: DOCGRAPH_SCHEMA_VERSION.to_string(),
        backend: state.store.backend_name().to_string(),
        store_connected: ping.is_ok(),
        engine_reporting: state.engine_reporting,
        details: ping.err().map(|e| e.to_string()),
    })
}

/// Liveness probe endpoint.
///
/// Does NOT check dependencies.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 if the store answers a ping, 503 otherwise.
async fn readiness_handler(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    match state.store.ping().await {
        Ok(()) => Ok(Json(ReadinessResponse {
            ready: true,
            store: true,
            details: None,
        })),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                store: false,
                details: Some(e.to_string()),
            }),
        )),
    }
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the GraphQL service.
pub fn create_router(state: ServiceState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // GraphQL endpoint, mounted at the root and at /graphql
        .route("/", get(graphiql_handler).post(graphql_handler))
        .route("/graphql", get(graphiql_handler).post(graphql_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, DocumentStore, InMemoryDocumentStore, StoreError, StoreHandle};
    use crate::types::Collection;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct DownStore;

    #[async_trait]
    impl DocumentStore for DownStore {
        fn backend_name(&self) -> &'static str {
            "down"
        }
        async fn get(&self, _: Collection, _: &str) -> Result<Option<Document>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn set(&self, _: Collection, _: &str, _: Document) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn delete(&self, _: Collection, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn list(&self, _: Collection) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn find_by(&self, _: Collection, _: &str, _: &Value) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn router() -> Router {
        let state = ServiceState::with_defaults(StoreHandle::new(InMemoryDocumentStore::new())).unwrap();
        create_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_graphql(app: Router, path: &str, query: &str) -> Value {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_graphql_served_at_root() {
        let body = post_graphql(
            router(),
            "/",
            r#"mutation { addUser(creds: {id: "u1", email: "a@b.com", username: "alice"}) { id username } }"#,
        )
        .await;
        assert_eq!(body["data"]["addUser"]["username"], "alice");
    }

    #[tokio::test]
    async fn test_graphql_served_at_graphql_path() {
        let body = post_graphql(router(), "/graphql", "{ users { id } }").await;
        assert_eq!(body["data"]["users"], json!([]));
    }

    #[tokio::test]
    async fn test_graphiql_page() {
        let request = Request::builder().uri("/graphql").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_liveness() {
        let request = Request::builder().uri("/health/live").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(body_json(response).await["status"], "alive");
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "memory");
        assert_eq!(body["engine_reporting"], false);
    }

    #[tokio::test]
    async fn test_readiness_fails_when_store_down() {
        let state = ServiceState::with_defaults(StoreHandle::new(DownStore)).unwrap();
        let request = Request::builder().uri("/health/ready").body(Body::empty()).unwrap();
        let response = create_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_graphql_error() {
        let state = ServiceState::with_defaults(StoreHandle::new(DownStore)).unwrap();
        let body = post_graphql(create_router(state), "/graphql", r#"{ post(id: "p1") { title } }"#).await;
        assert_eq!(body["data"]["post"], Value::Null);
        assert_eq!(body["errors"][0]["extensions"]["code"], "STORE_FAILURE");
        assert!(body["errors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }
}
