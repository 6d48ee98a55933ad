//! Comment documents.

use async_graphql::{InputObject, SimpleObject, ID};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity};

/// A comment left by a user on a post.
///
/// Exposed to GraphQL as `Comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[graphql(complex, name = "Comments", rename_fields = "snake_case")]
pub struct Comment {
    /// Document key in `comments`.
    #[graphql(skip)]
    pub id: String,
    /// Comment text.
    pub body: String,
    /// Id of the commenting user.
    pub user_id: String,
    /// Id of the parent post (a `posts` key, not a `users` key).
    pub post_id: String,
}

impl Entity for Comment {
    const COLLECTION: Collection = Collection::Comments;
    const KIND: &'static str = "Comment";
    const FIELDS: &'static [&'static str] = &["id", "body", "user_id", "post_id"];

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "body" => Some(&self.body),
            "user_id" => Some(&self.user_id),
            "post_id" => Some(&self.post_id),
            _ => None,
        }
    }
}

/// Full field set for creating or overwriting a comment.
#[derive(Debug, Clone, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CommentCreds {
    /// Key to create or overwrite.
    pub id: ID,
    /// Comment text.
    pub body: String,
    /// Commenting user.
    pub user_id: String,
    /// Parent post.
    pub post_id: String,
}

impl From<CommentCreds> for Comment {
    fn from(creds: CommentCreds) -> Self {
        Self {
            id: creds.id.0,
            body: creds.body,
            user_id: creds.user_id,
            post_id: creds.post_id,
        }
    }
}
