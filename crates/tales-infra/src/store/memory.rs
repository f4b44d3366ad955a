//! In-memory post store - used when no database is configured and in tests.
//!
//! Mirrors the hosted store's behavior: it assigns ids and timestamps,
//! joins author profiles on read, rejects empty title/content, and hides
//! rows the caller does not own from `update`/`delete`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use tales_core::StoreError;
use tales_core::domain::{AuthorProfile, NewPost, Post, PostPatch};
use tales_core::ports::{PostQuery, PostStore, SortOrder};

/// In-memory posts table plus a profiles table for the author join.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    rows: RwLock<Vec<Post>>,
    profiles: RwLock<HashMap<Uuid, AuthorProfile>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Create or replace the profile row for `user_id`.
    pub async fn upsert_profile(&self, user_id: Uuid, profile: AuthorProfile) {
        self.profiles.write().await.insert(user_id, profile);
    }

    async fn join_author(&self, mut post: Post) -> Post {
        post.author = self.profiles.read().await.get(&post.author_id).cloned();
        post
    }

    fn check_required(title: &str, content: &str) -> Result<(), StoreError> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(StoreError::Constraint(
                "title and content must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn query(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = {
            let rows = self.rows.read().await;
            rows.iter()
                .filter(|p| query.author_id.is_none_or(|author| p.author_id == author))
                .cloned()
                .collect()
        };

        // Rows are kept in insertion order; the stable sort keeps that order
        // for equal timestamps.
        match query.order {
            SortOrder::NewestFirst => {
                posts.reverse();
                posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            SortOrder::OldestFirst => posts.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        if query.with_author {
            let profiles = self.profiles.read().await;
            for post in &mut posts {
                post.author = profiles.get(&post.author_id).cloned();
            }
        }

        tracing::debug!(
            author_id = ?query.author_id,
            count = posts.len(),
            "In-memory post query"
        );
        Ok(posts)
    }

    async fn fetch(&self, id: Uuid) -> Result<Post, StoreError> {
        let post = self
            .rows
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        Ok(self.join_author(post).await)
    }

    async fn insert(&self, row: NewPost) -> Result<Post, StoreError> {
        Self::check_required(&row.title, &row.content)?;

        let post = Post {
            id: Uuid::new_v4(),
            title: row.title,
            content: row.content,
            destination: row.destination,
            image_url: row.image_url,
            author_id: row.author_id,
            created_at: Utc::now(),
            author: None,
        };
        self.rows.write().await.push(post.clone());

        tracing::debug!(post_id = %post.id, "Inserted post");
        Ok(self.join_author(post).await)
    }

    async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        patch: PostPatch,
    ) -> Result<Post, StoreError> {
        let updated = {
            let mut rows = self.rows.write().await;
            let post = rows
                .iter_mut()
                .find(|p| p.id == id && p.author_id == caller)
                .ok_or(StoreError::NotFound)?;

            let mut candidate = post.clone();
            patch.apply_to(&mut candidate);
            Self::check_required(&candidate.title, &candidate.content)?;
            *post = candidate.clone();
            candidate
        };

        tracing::debug!(post_id = %id, "Updated post");
        Ok(self.join_author(updated).await)
    }

    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let position = rows
            .iter()
            .position(|p| p.id == id && p.author_id == caller)
            .ok_or(StoreError::NotFound)?;
        rows.remove(position);

        tracing::debug!(post_id = %id, "Deleted post");
        Ok(())
    }
}
