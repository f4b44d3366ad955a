//! The post repository: owns the cached feed and mediates every read and
//! write against the hosted store.

mod feed;

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostDraft, PostPatch};
use crate::error::RepositoryError;
use crate::ports::{IdentityProvider, Notification, Notifier, PostQuery, PostStore};
use crate::search;

use feed::FeedState;

const LOAD_FAILED: &str = "Failed to load blogs. Please try again.";
const GET_FAILED: &str = "Failed to load blog post. Please try again.";
const CREATE_FAILED: &str = "Failed to create blog post. Please try again.";
const UPDATE_FAILED: &str = "Failed to update blog post. Please try again.";
const DELETE_FAILED: &str = "Failed to delete blog post. Please try again.";

/// Cached access to the posts table.
///
/// Cloning is cheap and every clone shares the same cache. Mutations never
/// patch the cache in place; they re-fetch the whole feed on success.
/// Store failures are caught here and returned as `RepositoryError`, and
/// each one is also pushed to the `Notifier`.
#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn PostStore>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
    feed: Arc<FeedState>,
}

impl PostRepository {
    pub fn new(
        store: Arc<dyn PostStore>,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            identity,
            notifier,
            feed: Arc::new(FeedState::new()),
        }
    }

    /// A handle sharing this cache but acting as a different identity.
    pub fn with_identity(&self, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            ..self.clone()
        }
    }

    /// Current cached feed, newest first.
    pub fn posts(&self) -> Arc<[Post]> {
        self.feed.snapshot()
    }

    /// True while at least one feed fetch is in flight.
    pub fn loading(&self) -> bool {
        self.feed.is_loading()
    }

    pub fn subscribe_posts(&self) -> watch::Receiver<Arc<[Post]>> {
        self.feed.subscribe_posts()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.feed.subscribe_loading()
    }

    /// Run the search filter over the cached feed.
    pub fn search(&self, query: &str) -> Vec<Post> {
        let posts = self.posts();
        search::filter_posts(query, &posts)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Fetch every post, newest first, and replace the cache.
    ///
    /// On failure the cache keeps its previous contents.
    pub async fn list_all(&self) -> Result<Arc<[Post]>, RepositoryError> {
        let ticket = self.feed.begin_fetch();

        match self.store.query(&PostQuery::feed()).await {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "Fetched feed");
                Ok(ticket.apply(posts))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching blogs");
                Err(self.fail(RepositoryError::from_store(LOAD_FAILED, e)))
            }
        }
    }

    /// Fetch one post by id. Does not touch the cache.
    pub async fn get(&self, id: Uuid) -> Result<Post, RepositoryError> {
        self.store.fetch(id).await.map_err(|e| {
            tracing::warn!(post_id = %id, error = %e, "Error fetching blog");
            self.fail(RepositoryError::from_store(GET_FAILED, e))
        })
    }

    /// Publish a new post as the current user.
    ///
    /// Validation is the caller's job; see `PostDraft::validate`.
    pub async fn create(&self, draft: PostDraft) -> Result<Post, RepositoryError> {
        let Some(author_id) = self.identity.current_user().await else {
            tracing::warn!("Create attempted without an authenticated user");
            return Err(self.fail(RepositoryError::unauthenticated()));
        };

        let row = NewPost::from_draft(draft, author_id);
        let post = self.store.insert(row).await.map_err(|e| {
            tracing::error!(author_id = %author_id, error = %e, "Error creating blog");
            self.fail(RepositoryError::from_store(CREATE_FAILED, e))
        })?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Blog created");
        self.notifier.notify(Notification::success(
            "Blog Created!",
            "Your travel story has been published successfully.",
        ));
        self.reload().await;
        Ok(post)
    }

    /// Apply a partial update to a post the current user owns.
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, RepositoryError> {
        let Some(caller) = self.identity.current_user().await else {
            tracing::warn!(post_id = %id, "Update attempted without an authenticated user");
            return Err(self.fail(RepositoryError::unauthenticated()));
        };
        let post = self.store.update(caller, id, patch).await.map_err(|e| {
            tracing::error!(post_id = %id, error = %e, "Error updating blog");
            self.fail(RepositoryError::from_store(UPDATE_FAILED, e))
        })?;

        tracing::info!(post_id = %id, "Blog updated");
        self.notifier.notify(Notification::success(
            "Blog Updated!",
            "Your changes have been saved successfully.",
        ));
        self.reload().await;
        Ok(post)
    }

    /// Permanently remove a post the current user owns.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let Some(caller) = self.identity.current_user().await else {
            tracing::warn!(post_id = %id, "Delete attempted without an authenticated user");
            return Err(self.fail(RepositoryError::unauthenticated()));
        };
        self.store.delete(caller, id).await.map_err(|e| {
            tracing::error!(post_id = %id, error = %e, "Error deleting blog");
            self.fail(RepositoryError::from_store(DELETE_FAILED, e))
        })?;

        tracing::info!(post_id = %id, "Blog deleted");
        self.notifier.notify(Notification::success(
            "Blog Deleted",
            "Your blog post has been deleted successfully.",
        ));
        self.reload().await;
        Ok(())
    }

    /// One author's posts, newest first.
    ///
    /// Unknown authors and fetch failures both yield an empty list; a
    /// failure is logged and notified but never returned.
    pub async fn list_by_author(&self, author_id: Uuid) -> Vec<Post> {
        match self.store.query(&PostQuery::by_author(author_id)).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!(author_id = %author_id, error = %e, "Error fetching user blogs");
                self.fail(RepositoryError::from_store(LOAD_FAILED, e));
                Vec::new()
            }
        }
    }

    async fn reload(&self) {
        // list_all reports its own failure.
        let _ = self.list_all().await;
    }

    fn fail(&self, err: RepositoryError) -> RepositoryError {
        self.notifier.notify(Notification::error(err.description()));
        err
    }
}
