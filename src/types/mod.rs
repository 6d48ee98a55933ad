//! Entity documents for the three collections.
//!
//! Every entity is a flat document keyed by a caller-supplied string id.
//! Relationships are never embedded; they are stored as plain foreign-key
//! fields and resolved at read time (see [`crate::relations`]).

pub mod comment;
pub mod post;
pub mod user;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Document, StoreError};

pub use comment::{Comment, CommentCreds};
pub use post::{Post, PostCreds};
pub use user::{User, UserCreds};

/// A named collection in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// `users`
    Users,
    /// `posts`
    Posts,
    /// `comments`
    Comments,
}

impl Collection {
    /// All collections, in declaration order.
    pub const ALL: [Collection; 3] = [Self::Users, Self::Posts, Self::Comments];

    /// Storage name of the collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Posts => "posts",
            Self::Comments => "comments",
        }
    }

    /// Parse a collection from its storage name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "users" => Some(Self::Users),
            "posts" => Some(Self::Posts),
            "comments" => Some(Self::Comments),
            _ => None,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document type stored in exactly one collection.
///
/// The declared `FIELDS` are the full stored shape: encoding always writes
/// every one of them, so a write is a full overwrite of the document.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the entity lives in.
    const COLLECTION: Collection;
    /// Human-readable kind, used in messages ("User", "Post", ...).
    const KIND: &'static str;
    /// Stored document fields.
    const FIELDS: &'static [&'static str];

    /// Storage key of the document.
    fn id(&self) -> &str;

    /// String value of a stored field, if present.
    fn field(&self, name: &str) -> Option<&str>;

    /// Decode a stored document.
    fn from_document(id: &str, document: Document) -> Result<Self, StoreError> {
        serde_json::from_value(Value::Object(document)).map_err(|e| StoreError::Malformed {
            collection: Self::COLLECTION,
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Encode into a document with every declared field present.
    fn to_document(&self) -> Result<Document, StoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StoreError::Malformed {
                collection: Self::COLLECTION,
                id: self.id().to_string(),
                reason: format!("expected an object, encoded {}", other),
            }),
            Err(e) => Err(StoreError::Malformed {
                collection: Self::COLLECTION,
                id: self.id().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Confirmation returned by the delete mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, async_graphql::SimpleObject)]
pub struct DeleteResponse {
    /// Human-readable message naming the deleted id.
    pub response: String,
}

impl DeleteResponse {
    /// Confirmation for a delete of `id` in the collection of `E`.
    pub fn deleted<E: Entity>(id: &str) -> Self {
        Self {
            response: format!("{} with ID: {} has been deleted.", E::KIND, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_str(collection.as_str()), Some(collection));
        }
        assert_eq!(Collection::from_str("Posts"), Some(Collection::Posts));
        assert_eq!(Collection::from_str("threads"), None);
    }

    #[test]
    fn test_encoding_writes_every_declared_field() {
        let user = User {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            username: "alice".to_string(),
            img_url: None,
        };
        let doc = user.to_document().unwrap();
        for field in User::FIELDS {
            assert!(doc.contains_key(*field), "missing {}", field);
        }
        assert_eq!(doc.get("img_url"), Some(&Value::Null));
    }

    #[test]
    fn test_delete_response_names_kind_and_id() {
        let response = DeleteResponse::deleted::<Post>("p9");
        assert_eq!(response.response, "Post with ID: p9 has been deleted.");
    }

    #[test]
    fn test_decoding_missing_required_field_is_malformed() {
        let mut doc = Document::new();
        doc.insert("id".to_string(), Value::from("u1"));
        doc.insert("username".to_string(), Value::from("alice"));

        let err = User::from_document("u1", doc).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Malformed { collection: Collection::Users, .. }
        ));
        assert!(err.to_string().contains("email"));
    }
}
