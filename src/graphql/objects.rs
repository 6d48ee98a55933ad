//! Relationship fields of the entity types.
//!
//! Each field is backed by one entry of [`crate::relations::RELATIONS`] and
//! only runs when the query selects it.

use async_graphql::{ComplexObject, Context, ResultExt, ID};

use crate::relations::{self, COMMENT_POST, COMMENT_USER, POST_COMMENTS, POST_USER, USER_POSTS};
use crate::store::StoreHandle;
use crate::types::{Comment, Post, User};

#[ComplexObject]
impl User {
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> ID {
        ID(self.id.clone())
    }

    /// Posts whose `user_id` is this user's id.
    async fn posts(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Vec<Post>>> {
        let store = ctx.data::<StoreHandle>()?;
        relations::resolve_many(store, &USER_POSTS, self)
            .await
            .map(Some)
            .extend()
    }
}

#[ComplexObject]
impl Post {
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> ID {
        ID(self.id.clone())
    }

    /// The author, or null when `user_id` points at no user.
    async fn user(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let store = ctx.data::<StoreHandle>()?;
        relations::resolve_one(store, &POST_USER, self).await.extend()
    }

    /// Comments whose `post_id` is this post's id.
    async fn comments(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Vec<Comment>>> {
        let store = ctx.data::<StoreHandle>()?;
        relations::resolve_many(store, &POST_COMMENTS, self)
            .await
            .map(Some)
            .extend()
    }
}

#[ComplexObject]
impl Comment {
    #[graphql(name = "id")]
    async fn graphql_id(&self) -> ID {
        ID(self.id.clone())
    }

    /// The commenter, or null when `user_id` points at no user.
    async fn user(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let store = ctx.data::<StoreHandle>()?;
        relations::resolve_one(store, &COMMENT_USER, self).await.extend()
    }

    /// The parent post, looked up in `posts`.
    async fn post(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Post>> {
        let store = ctx.data::<StoreHandle>()?;
        relations::resolve_one(store, &COMMENT_POST, self).await.extend()
    }
}
