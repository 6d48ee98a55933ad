//! Mutation root.
//!
//! `add*` and `update*` are the same full-document overwrite followed by a
//! read-back; `delete*` is an unconditional hard delete with no cascade.

use async_graphql::{Context, Object, ResultExt, ID};

use crate::handlers;
use crate::store::StoreHandle;
use crate::types::{Comment, CommentCreds, DeleteResponse, Post, PostCreds, User, UserCreds};

/// Document writes.
#[derive(Debug, Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn add_user(&self, ctx: &Context<'_>, creds: UserCreds) -> async_graphql::Result<User> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::add(store, User::from(creds)).await.extend()
    }

    async fn add_post(&self, ctx: &Context<'_>, creds: PostCreds) -> async_graphql::Result<Post> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::add(store, Post::from(creds)).await.extend()
    }

    async fn add_comment(&self, ctx: &Context<'_>, creds: CommentCreds) -> async_graphql::Result<Comment> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::add(store, Comment::from(creds)).await.extend()
    }

    async fn update_user(&self, ctx: &Context<'_>, creds: UserCreds) -> async_graphql::Result<User> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::update(store, User::from(creds)).await.extend()
    }

    async fn update_post(&self, ctx: &Context<'_>, creds: PostCreds) -> async_graphql::Result<Post> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::update(store, Post::from(creds)).await.extend()
    }

    async fn update_comment(&self, ctx: &Context<'_>, creds: CommentCreds) -> async_graphql::Result<Comment> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::update(store, Comment::from(creds)).await.extend()
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<DeleteResponse> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::delete::<User>(store, &id).await.extend()
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<DeleteResponse> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::delete::<Post>(store, &id).await.extend()
    }

    async fn delete_comment(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<DeleteResponse> {
        let store = ctx.data::<StoreHandle>()?;
        handlers::delete::<Comment>(store, &id).await.extend()
    }
}
