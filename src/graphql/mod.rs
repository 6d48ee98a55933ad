//! GraphQL schema.
//!
//! ```graphql
//! type Query {
//!   user(id: String!): User
//!   users: [User]
//!   post(id: String!): Posts
//!   posts: [Posts]
//!   comment(id: String!): Comments
//!   comments: [Comments]
//! }
//!
//! type Mutation {
//!   addUser(creds: UserCreds!): User!
//!   addPost(creds: PostCreds!): Posts!
//!   addComment(creds: CommentCreds!): Comments!
//!   updateUser(creds: UserCreds!): User!
//!   updatePost(creds: PostCreds!): Posts!
//!   updateComment(creds: CommentCreds!): Comments!
//!   deleteUser(id: ID!): DeleteResponse!
//!   deletePost(id: ID!): DeleteResponse!
//!   deleteComment(id: ID!): DeleteResponse!
//! }
//! ```
//!
//! Relationship fields (`User.posts`, `Posts.user`, `Posts.comments`,
//! `Comments.user`, `Comments.post`) are nullable: a dangling reference
//! resolves to `null` rather than an error.

mod mutation;
mod objects;
mod query;

use async_graphql::{EmptySubscription, Schema};
use tracing::info;

use crate::relations::{validate_relations, RegistryError, RELATIONS};
use crate::store::StoreHandle;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// The executable schema.
pub type DocGraphSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Schema builder options.
#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    /// Maximum query depth. `None` leaves nesting unbounded.
    pub depth_limit: Option<usize>,
}

/// Build the schema around a store handle.
///
/// Fails if the relationship table is inconsistent, so a bad table stops
/// the process at startup instead of surfacing on the first query.
pub fn build_schema(store: StoreHandle, options: &SchemaOptions) -> Result<DocGraphSchema, RegistryError> {
    validate_relations(&RELATIONS)?;

    info!(
        backend = store.backend_name(),
        relations = RELATIONS.len(),
        depth_limit = ?options.depth_limit,
        "Building GraphQL schema"
    );

    let mut builder = Schema::build(QueryRoot, MutationRoot, EmptySubscription).data(store);
    if let Some(depth) = options.depth_limit {
        builder = builder.limit_depth(depth);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;

    fn schema() -> DocGraphSchema {
        build_schema(StoreHandle::new(InMemoryDocumentStore::new()), &SchemaOptions::default()).unwrap()
    }

    #[test]
    fn test_sdl_keeps_declared_nullability() {
        let sdl = schema().sdl();
        assert!(sdl.contains("email: String!"));
        assert!(sdl.contains("username: String!"));
        assert!(sdl.contains("img_url: String\n"));
        assert!(sdl.contains("user_id: String!"));
        assert!(sdl.contains("post_id: String!"));
        assert!(sdl.contains("posts: [Posts!]"));
        assert!(sdl.contains("comments: [Comments!]"));
        assert!(sdl.contains("user(id: String!): User"));
        assert!(sdl.contains("users: [User]"));
        assert!(sdl.contains("addUser(creds: UserCreds!): User!"));
        assert!(sdl.contains("deleteComment(id: ID!): DeleteResponse!"));
    }

    fn type_block<'a>(sdl: &'a str, name: &str) -> &'a str {
        let start = sdl
            .find(&format!("type {} {{", name))
            .unwrap_or_else(|| panic!("type {} missing from SDL", name));
        let end = start + sdl[start..].find('}').unwrap();
        &sdl[start..end]
    }

    #[test]
    fn test_entity_ids_are_non_null_ids() {
        let sdl = schema().sdl();
        for name in ["User", "Posts", "Comments"] {
            let block = type_block(&sdl, name);
            assert!(
                block.lines().any(|line| line.trim() == "id: ID!"),
                "{} should expose id: ID!, got:\n{}",
                name,
                block
            );
        }
    }

    #[test]
    fn test_comment_post_is_typed_as_post() {
        let sdl = schema().sdl();
        assert!(sdl.contains("post: Posts\n"));
        assert!(!sdl.contains("post: User"));
    }

    #[tokio::test]
    async fn test_introspection_enabled() {
        let response = schema().execute("{ __schema { queryType { name } } }").await;
        assert!(response.errors.is_empty());
        let data = response.data.into_json().unwrap();
        assert_eq!(data["__schema"]["queryType"]["name"], "Query");
    }

    #[tokio::test]
    async fn test_depth_limit_applies() {
        let options = SchemaOptions { depth_limit: Some(2) };
        let schema = build_schema(StoreHandle::new(InMemoryDocumentStore::new()), &options).unwrap();
        let response = schema
            .execute("{ posts { user { posts { id } } } }")
            .await;
        assert!(!response.errors.is_empty());
    }
}
