//! # docgraph
//!
//! A GraphQL facade over a schemaless document store.
//!
//! Three entities (users, posts, comments) live in three independent
//! collections keyed by caller-assigned ids. The store has no joins, so one
//! GraphQL query graph is satisfied by independent point lookups and
//! filtered scans, one per requested relationship edge.
//!
//! ## Architecture
//!
//! ```text
//! GraphQL request → QueryRoot / MutationRoot → handlers ─┐
//!                         ↓                               ├→ StoreHandle → DocumentStore
//!              entity relationship fields → relations ───┘     (Postgres or Memory)
//! ```
//!
//! ## Consistency Rules
//!
//! - Writes are full overwrites keyed by id; add and update are the same operation
//! - Every write is followed by a read-back whose result is returned
//! - Deletes are unconditional and never cascade
//! - A dangling foreign key resolves to `null`, not an error

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod relations;
pub mod store;
pub mod types;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use config::{ServiceConfig, StoreBackend};
pub use error::ApiError;
pub use graphql::{build_schema, DocGraphSchema, MutationRoot, QueryRoot, SchemaOptions};
pub use relations::{Relation, RegistryError, RELATIONS};
pub use store::{Document, DocumentStore, InMemoryDocumentStore, StoreError, StoreHandle};
#[cfg(feature = "postgres")]
pub use store::PostgresDocumentStore;
pub use types::{
    Collection, Comment, CommentCreds, DeleteResponse, Entity, Post, PostCreds, User, UserCreds,
};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState};

/// Version of the exposed GraphQL contract.
/// Increment on breaking changes to any type or operation.
pub const DOCGRAPH_SCHEMA_VERSION: &str = "1.0.0";
