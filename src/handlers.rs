//! Root operation handlers.
//!
//! One generic implementation per operation, shared by the three entities:
//!
//! | Operation | Store calls                  | Result                         |
//! |-----------|------------------------------|--------------------------------|
//! | get       | `get`                        | entity or `NotFound`           |
//! | list      | `list`                       | every document, backend order  |
//! | add       | `set` then `get`             | the freshly read entity        |
//! | update    | `set` then `get`             | same as add                    |
//! | delete    | `delete`                     | confirmation message           |
//!
//! Store failures are converted to [`ApiError::Store`] at this boundary and
//! never retried.

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::store::StoreHandle;
use crate::types::{DeleteResponse, Entity};

/// Fetch one entity by id.
pub async fn get_by_id<E: Entity>(store: &StoreHandle, id: &str) -> Result<E, ApiError> {
    let result = match store.get(E::COLLECTION, id).await {
        Ok(Some(doc)) => E::from_document(id, doc).map_err(ApiError::from),
        Ok(None) => Err(ApiError::NotFound {
            kind: E::KIND,
            id: id.to_string(),
        }),
        Err(e) => Err(e.into()),
    };
    log_outcome::<E, _>("get", id, result)
}

/// Every entity in the collection.
pub async fn list_all<E: Entity>(store: &StoreHandle) -> Result<Vec<E>, ApiError> {
    let docs = store
        .list(E::COLLECTION)
        .await
        .map_err(|e| log_failure::<E>("list", "*", e.into()))?;

    docs.into_iter()
        .map(|doc| {
            let id = doc
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            E::from_document(&id, doc)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| log_failure::<E>("list", "*", e.into()))
}

/// Create or overwrite an entity and return it as read back from the store.
pub async fn add<E: Entity>(store: &StoreHandle, entity: E) -> Result<E, ApiError> {
    write_then_read("add", store, entity).await
}

/// Overwrite an entity. Identical to [`add`]: omitted optional fields are
/// cleared and a missing id is created.
pub async fn update<E: Entity>(store: &StoreHandle, entity: E) -> Result<E, ApiError> {
    write_then_read("update", store, entity).await
}

/// Delete an entity by id. Succeeds whether or not the id exists and does
/// not touch documents that reference it.
pub async fn delete<E: Entity>(store: &StoreHandle, id: &str) -> Result<DeleteResponse, ApiError> {
    let result = store
        .delete(E::COLLECTION, id)
        .await
        .map(|()| DeleteResponse::deleted::<E>(id))
        .map_err(ApiError::from);
    log_outcome::<E, _>("delete", id, result)
}

async fn write_then_read<E: Entity>(op: &'static str, store: &StoreHandle, entity: E) -> Result<E, ApiError> {
    let id = entity.id().to_string();
    let document = entity
        .to_document()
        .map_err(|e| log_failure::<E>(op, &id, e.into()))?;

    store
        .set(E::COLLECTION, &id, document)
        .await
        .map_err(|e| log_failure::<E>(op, &id, e.into()))?;

    // The pair is not atomic; a concurrent write may be observed here.
    let result = match store.get(E::COLLECTION, &id).await {
        Ok(Some(doc)) => E::from_document(&id, doc).map_err(ApiError::from),
        Ok(None) => Err(ApiError::Inconsistent {
            kind: E::KIND,
            id: id.clone(),
        }),
        Err(e) => Err(e.into()),
    };
    log_outcome::<E, _>(op, &id, result)
}

fn log_outcome<E: Entity, T>(op: &str, id: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            debug!(op = op, collection = %E::COLLECTION, id = id, "operation succeeded");
            Ok(value)
        }
        Err(e) => Err(log_failure::<E>(op, id, e)),
    }
}

fn log_failure<E: Entity>(op: &str, id: &str, error: ApiError) -> ApiError {
    warn!(
        op = op,
        collection = %E::COLLECTION,
        id = id,
        code = error.code(),
        error = %error,
        "operation failed"
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, InMemoryDocumentStore};
    use crate::types::{Collection, Post, User};
    use serde_json::json;
    use std::sync::Arc;

    fn alice() -> User {
        User {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            username: "alice".to_string(),
            img_url: Some("https://img/alice.png".to_string()),
        }
    }

    fn handle() -> (Arc<InMemoryDocumentStore>, StoreHandle) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handle = StoreHandle::from_arc(store.clone());
        (store, handle)
    }

    #[tokio::test]
    async fn test_add_then_get_returns_same_fields() {
        let (_, store) = handle();
        let added = add(&store, alice()).await.unwrap();
        assert_eq!(added, alice());

        let fetched: User = get_by_id(&store, "u1").await.unwrap();
        assert_eq!(fetched, alice());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_, store) = handle();
        let err = get_by_id::<Post>(&store, "p404").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Post ID not found");
    }

    #[tokio::test]
    async fn test_update_is_full_overwrite() {
        let (raw, store) = handle();
        add(&store, alice()).await.unwrap();

        let renamed = User {
            username: "alicia".to_string(),
            img_url: None,
            ..alice()
        };
        let updated = update(&store, renamed).await.unwrap();
        assert_eq!(updated.username, "alicia");
        assert_eq!(updated.img_url, None);

        let stored = raw.snapshot(Collection::Users, "u1").unwrap();
        assert_eq!(stored["img_url"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_update_missing_id_creates_it() {
        let (raw, store) = handle();
        update(&store, alice()).await.unwrap();
        assert_eq!(raw.len(Collection::Users), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_, store) = handle();
        let first = delete::<User>(&store, "ghost").await.unwrap();
        let second = delete::<User>(&store, "ghost").await.unwrap();
        assert_eq!(first, second);
        assert!(first.response.contains("ghost"));
    }

    #[tokio::test]
    async fn test_list_surfaces_malformed_documents() {
        let (raw, store) = handle();
        let mut doc = Document::new();
        doc.insert("id".to_string(), json!("p1"));
        doc.insert("title".to_string(), json!("no body"));
        raw.insert(Collection::Posts, "p1", doc);

        let err = list_all::<Post>(&store).await.unwrap_err();
        assert_eq!(err.code(), "STORE_FAILURE");
        assert!(err.to_string().contains("posts/p1"));
    }
}
