//! Relationship resolution.
//!
//! Each relationship field is an entry in [`RELATIONS`], mapping
//! `(owner, field)` to a target collection and the link used to reach it.
//! Resolvers are stateless: every call is one fresh store round trip, with
//! no cache shared between sibling fields or requests. A query that selects
//! nested relationships therefore issues one fetch per resolved edge.
//!
//! ```text
//! User ──posts──────▶ Post      back-reference  posts.user_id    == user.id
//! Post ──user───────▶ User      foreign key     users[post.user_id]
//! Post ──comments───▶ Comment   back-reference  comments.post_id == post.id
//! Comment ──user────▶ User      foreign key     users[comment.user_id]
//! Comment ──post────▶ Post      foreign key     posts[comment.post_id]
//! ```

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::trace;

use crate::error::ApiError;
use crate::store::{StoreError, StoreHandle};
use crate::types::{Collection, Comment, Entity, Post, User};

/// How a relationship reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Point lookup of the target by the owner's field value.
    ForeignKey(&'static str),
    /// Filtered scan of the target where this target field equals the owner's id.
    BackReference(&'static str),
}

/// One relationship field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Collection of the entity exposing the field.
    pub owner: Collection,
    /// Field name on the owner.
    pub field: &'static str,
    /// Collection the field resolves into.
    pub target: Collection,
    /// Link used to reach the target.
    pub link: Link,
}

/// `User.posts`
pub const USER_POSTS: Relation = Relation {
    owner: Collection::Users,
    field: "posts",
    target: Collection::Posts,
    link: Link::BackReference("user_id"),
};

/// `Posts.user`
pub const POST_USER: Relation = Relation {
    owner: Collection::Posts,
    field: "user",
    target: Collection::Users,
    link: Link::ForeignKey("user_id"),
};

/// `Posts.comments`
pub const POST_COMMENTS: Relation = Relation {
    owner: Collection::Posts,
    field: "comments",
    target: Collection::Comments,
    link: Link::BackReference("post_id"),
};

/// `Comments.user`
pub const COMMENT_USER: Relation = Relation {
    owner: Collection::Comments,
    field: "user",
    target: Collection::Users,
    link: Link::ForeignKey("user_id"),
};

/// `Comments.post`
pub const COMMENT_POST: Relation = Relation {
    owner: Collection::Comments,
    field: "post",
    target: Collection::Posts,
    link: Link::ForeignKey("post_id"),
};

/// Every relationship field exposed by the schema.
pub const RELATIONS: [Relation; 5] = [USER_POSTS, POST_USER, POST_COMMENTS, COMMENT_USER, COMMENT_POST];

/// Inconsistency in the relationship table, detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two entries claim the same `(owner, field)`.
    #[error("Duplicate relationship {owner}.{field}")]
    Duplicate {
        /// Owner collection.
        owner: Collection,
        /// Field name.
        field: &'static str,
    },
    /// A relationship field hides a stored field.
    #[error("Relationship {owner}.{field} shadows a stored field")]
    ShadowsStoredField {
        /// Owner collection.
        owner: Collection,
        /// Field name.
        field: &'static str,
    },
    /// The link field is not declared on the collection it is read from.
    #[error("Relationship {owner}.{field} links through undeclared field {collection}.{link_field}")]
    UndeclaredLinkField {
        /// Owner collection.
        owner: Collection,
        /// Field name.
        field: &'static str,
        /// Collection expected to declare the link field.
        collection: Collection,
        /// The missing link field.
        link_field: &'static str,
    },
}

/// Stored fields declared by a collection's entity.
pub fn declared_fields(collection: Collection) -> &'static [&'static str] {
    match collection {
        Collection::Users => User::FIELDS,
        Collection::Posts => Post::FIELDS,
        Collection::Comments => Comment::FIELDS,
    }
}

/// Check a relationship table for consistency.
pub fn validate_relations(relations: &[Relation]) -> Result<(), RegistryError> {
    let mut seen = BTreeSet::new();

    for rel in relations {
        if !seen.insert((rel.owner, rel.field)) {
            return Err(RegistryError::Duplicate {
                owner: rel.owner,
                field: rel.field,
            });
        }

        if declared_fields(rel.owner).contains(&rel.field) {
            return Err(RegistryError::ShadowsStoredField {
                owner: rel.owner,
                field: rel.field,
            });
        }

        let (collection, link_field) = match rel.link {
            Link::ForeignKey(f) => (rel.owner, f),
            Link::BackReference(f) => (rel.target, f),
        };
        if !declared_fields(collection).contains(&link_field) {
            return Err(RegistryError::UndeclaredLinkField {
                owner: rel.owner,
                field: rel.field,
                collection,
                link_field,
            });
        }
    }

    Ok(())
}

fn check_endpoints<P: Entity, T: Entity>(rel: &Relation) -> Result<(), ApiError> {
    if rel.owner != P::COLLECTION || rel.target != T::COLLECTION {
        return Err(StoreError::Backend(format!(
            "relationship {}.{} resolves {} into {}, called as {} into {}",
            rel.owner,
            rel.field,
            rel.owner,
            rel.target,
            P::COLLECTION,
            T::COLLECTION
        ))
        .into());
    }
    Ok(())
}

/// Resolve a single-valued relationship.
///
/// A missing foreign-key value or a missing target document resolves to
/// `None`; only store failures are errors.
pub async fn resolve_one<P: Entity, T: Entity>(
    store: &StoreHandle,
    rel: &Relation,
    parent: &P,
) -> Result<Option<T>, ApiError> {
    check_endpoints::<P, T>(rel)?;

    let key_field = match rel.link {
        Link::ForeignKey(f) => f,
        Link::BackReference(_) => {
            return Err(StoreError::Backend(format!(
                "relationship {}.{} is a back-reference and yields a list",
                rel.owner, rel.field
            ))
            .into())
        }
    };

    let Some(key) = parent.field(key_field) else {
        trace!(owner = %rel.owner, field = rel.field, id = parent.id(), "no foreign key");
        return Ok(None);
    };

    match store.get(rel.target, key).await? {
        Some(doc) => Ok(Some(T::from_document(key, doc)?)),
        None => {
            trace!(
                owner = %rel.owner,
                field = rel.field,
                id = parent.id(),
                target_id = key,
                "dangling reference"
            );
            Ok(None)
        }
    }
}

/// Resolve a list-valued relationship.
///
/// Returns every target whose back-reference field equals the parent's id,
/// in store order, possibly empty.
pub async fn resolve_many<P: Entity, T: Entity>(
    store: &StoreHandle,
    rel: &Relation,
    parent: &P,
) -> Result<Vec<T>, ApiError> {
    check_endpoints::<P, T>(rel)?;

    let back_field = match rel.link {
        Link::BackReference(f) => f,
        Link::ForeignKey(_) => {
            return Err(StoreError::Backend(format!(
                "relationship {}.{} is a foreign key and yields one value",
                rel.owner, rel.field
            ))
            .into())
        }
    };

    let docs = store
        .find_by(rel.target, back_field, &Value::from(parent.id()))
        .await?;

    docs.into_iter()
        .map(|doc| {
            let id = doc
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            T::from_document(&id, doc).map_err(ApiError::from)
        })
        .collect()
}
