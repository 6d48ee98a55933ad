//! User documents.

use async_graphql::{InputObject, SimpleObject, ID};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity};

/// A user account.
///
/// Owns posts and comments by back-reference only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[graphql(complex, rename_fields = "snake_case")]
pub struct User {
    /// Caller-assigned id, also the storage key.
    #[graphql(skip)]
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Optional avatar URL.
    pub img_url: Option<String>,
}

impl Entity for User {
    const COLLECTION: Collection = Collection::Users;
    const KIND: &'static str = "User";
    const FIELDS: &'static [&'static str] = &["id", "email", "username", "img_url"];

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "email" => Some(&self.email),
            "username" => Some(&self.username),
            "img_url" => self.img_url.as_deref(),
            _ => None,
        }
    }
}

/// Full field set for creating or overwriting a user.
#[derive(Debug, Clone, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UserCreds {
    /// Id of the user to write.
    pub id: ID,
    /// Email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Optional avatar URL; omitting it clears any stored value.
    pub img_url: Option<String>,
}

impl From<UserCreds> for User {
    fn from(creds: UserCreds) -> Self {
        Self {
            id: creds.id.0,
            email: creds.email,
            username: creds.username,
            img_url: creds.img_url,
        }
    }
}
