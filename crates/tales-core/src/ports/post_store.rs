use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostPatch};
use crate::error::StoreError;

/// Ordering by `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Read query against the posts table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// Equality filter on the author column.
    pub author_id: Option<Uuid>,
    pub order: SortOrder,
    /// Embed the author's profile row.
    pub with_author: bool,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            author_id: None,
            order: SortOrder::NewestFirst,
            with_author: true,
        }
    }
}

impl PostQuery {
    /// Every post, newest first, with author profiles.
    pub fn feed() -> Self {
        Self::default()
    }

    /// One author's posts, newest first, with author profiles.
    pub fn by_author(author_id: Uuid) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }
}

/// Remote data client for the posts table.
///
/// Row-level authorization is the store's job: `update` and `delete` receive
/// the caller's id and must report rows the caller does not own as
/// `StoreError::NotFound`.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Run a filtered, ordered read.
    async fn query(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError>;

    /// Fetch a single post by primary key.
    async fn fetch(&self, id: Uuid) -> Result<Post, StoreError>;

    /// Insert a row; the store assigns `id` and `created_at`.
    async fn insert(&self, row: NewPost) -> Result<Post, StoreError>;

    /// Apply a partial update to a row owned by `caller`.
    async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        patch: PostPatch,
    ) -> Result<Post, StoreError>;

    /// Hard-delete a row owned by `caller`.
    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), StoreError>;
}
