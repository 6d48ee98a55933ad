//! Query root.

use async_graphql::{Context, Object, ResultExt};

use crate::handlers;
use crate::store::StoreHandle;
use crate::types::{Comment, Post, User};

/// Single lookups by id and full collection listings.
///
/// A lookup of a missing id yields `null` together with a `NOT_FOUND`
/// error, never an empty object.
#[derive(Debug, Default)]
pub struct QueryRoot;

/// `[T]` in the schema: nullable list of nullable items.
fn nullable_list<T>(items: Vec<T>) -> Option<Vec<Option<T>>> {
    Some(items.into_iter().map(Some).collect())
}

#[Object]
impl QueryRoot {
    async fn user(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<User>> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::get_by_id(store, &id).await.map(Some).extend()
    }

    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Vec<Option<User>>>> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::list_all(store).await.map(nullable_list).extend()
    }

    async fn post(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<Post>> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::get_by_id(store, &id).await.map(Some).extend()
    }

    async fn posts(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Vec<Option<Post>>>> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::list_all(store).await.map(nullable_list).extend()
    }

    async fn comment(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<Comment>> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::get_by_id(store, &id).await.map(Some).extend()
    }

    async fn comments(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Vec<Option<Comment>>>> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::list_all(store).await.map(nullable_list).extend()
    }
}
