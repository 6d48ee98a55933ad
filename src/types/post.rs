//! Post documents.

use async_graphql::{InputObject, SimpleObject, ID};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity};

/// A post written by a user.
///
/// Exposed to GraphQL as `Posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[graphql(complex, name = "Posts", rename_fields = "snake_case")]
pub struct Post {
    /// Caller-assigned id, also the storage key.
    #[graphql(skip)]
    pub id: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Id of the owning user. Not checked against `users`.
    pub user_id: String,
}

impl Entity for Post {
    const COLLECTION: Collection = Collection::Posts;
    const KIND: &'static str = "Post";
    const FIELDS: &'static [&'static str] = &["id", "title", "body", "user_id"];

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "title" => Some(&self.title),
            "body" => Some(&self.body),
            "user_id" => Some(&self.user_id),
            _ => None,
        }
    }
}

/// Full field set for creating or overwriting a post.
#[derive(Debug, Clone, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct PostCreds {
    /// Id of the post to write.
    pub id: ID,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Id of the owning user.
    pub user_id: String,
}

impl From<PostCreds> for Post {
    fn from(creds: PostCreds) -> Self {
        Self {
            id: creds.id.0,
            title: creds.title,
            body: creds.body,
            user_id: creds.user_id,
        }
    }
}
