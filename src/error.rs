//! API-visible errors.
//!
//! Every failure a caller can observe is one of three kinds: a point lookup
//! that found nothing, a store failure, or a write whose read-back found
//! nothing. Dangling foreign keys are not errors and never reach this type.

use async_graphql::ErrorExtensions;

use crate::store::StoreError;

/// Error returned by root operation handlers and relationship resolvers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A get-by-id found no document.
    #[error("{kind} ID not found")]
    NotFound {
        /// Entity kind ("User", "Post", "Comment").
        kind: &'static str,
        /// Requested id.
        id: String,
    },
    /// The document store failed.
    #[error("{0}")]
    Store(#[from] StoreError),
    /// A write was acknowledged but the read-back found no document.
    #[error("{kind} with ID: {id} was written but could not be read back")]
    Inconsistent {
        /// Entity kind.
        kind: &'static str,
        /// Written id.
        id: String,
    },
}

impl ApiError {
    /// Machine-readable error code, exposed as the `code` extension.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Store(_) => "STORE_FAILURE",
            Self::Inconsistent { .. } => "READ_AFTER_WRITE",
        }
    }

    /// Whether this is the not-found signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            match self {
                Self::NotFound { id, .. } | Self::Inconsistent { id, .. } => {
                    e.set("id", id.as_str());
                }
                Self::Store(_) => {}
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Collection;

    #[test]
    fn test_not_found_message_and_code() {
        let err = ApiError::NotFound {
            kind: "User",
            id: "u1".to_string(),
        };
        assert_eq!(err.to_string(), "User ID not found");
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_failure_carries_underlying_message() {
        let err = ApiError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(err.code(), "STORE_FAILURE");
        assert!(err.to_string().contains("connection refused"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_graphql_error_has_code_extension() {
        let err = ApiError::from(StoreError::Malformed {
            collection: Collection::Posts,
            id: "p1".to_string(),
            reason: "missing field `title`".to_string(),
        });
        let gql = err.extend();
        assert!(gql.message.contains("posts/p1"));
        let extensions = gql.extensions.expect("extensions set");
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from("STORE_FAILURE"))
        );
    }
}
