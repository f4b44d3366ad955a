//! Application state - shared across all handlers.

use std::sync::Arc;

use tales_core::PostRepository;
use tales_core::ports::PostStore;
use tales_infra::{BroadcastNotifier, FixedIdentity, InMemoryPostStore};

use crate::config::AppConfig;
use crate::middleware::auth::Identity;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Anonymous handle on the shared feed cache.
    pub posts: PostRepository,
    pub notifier: Arc<BroadcastNotifier>,
}

impl AppState {
    /// Build the state, using Postgres when configured and reachable.
    pub async fn new(config: &AppConfig) -> Self {
        Self::with_store(Self::build_store(config).await)
    }

    pub fn with_store(store: Arc<dyn PostStore>) -> Self {
        let notifier = Arc::new(BroadcastNotifier::from_env());
        let posts = PostRepository::new(
            store,
            Arc::new(FixedIdentity::anonymous()),
            notifier.clone(),
        );

        tracing::info!("Application state initialized");
        Self { posts, notifier }
    }

    /// Repository handle acting as the request's user.
    pub fn posts_as(&self, identity: &Identity) -> PostRepository {
        self.posts
            .with_identity(Arc::new(FixedIdentity::user(identity.user_id)))
    }

    #[cfg(feature = "postgres")]
    async fn build_store(config: &AppConfig) -> Arc<dyn PostStore> {
        use tales_infra::PostgresPostStore;

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
            return Arc::new(InMemoryPostStore::new());
        };

        match PostgresPostStore::connect(db_config).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryPostStore::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn build_store(_config: &AppConfig) -> Arc<dyn PostStore> {
        tracing::info!("Running without postgres feature - using in-memory store");
        Arc::new(InMemoryPostStore::new())
    }
}
