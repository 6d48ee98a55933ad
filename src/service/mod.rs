//! GraphQL HTTP Service
//!
//! Exposes the schema over HTTP.
//!
//! ## Endpoints
//!
//! - `POST /` and `POST /graphql` - Execute a GraphQL operation
//! - `GET /` and `GET /graphql` - GraphiQL explorer
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, record_graphql_operation};
pub use routes::{create_router, AppState};
pub use state::ServiceState;
