//! PostgreSQL post store backed by SeaORM.
//!
//! Row-level ownership is enforced in the queries themselves: `update` and
//! `delete` filter on both the primary key and the caller's user id, so a
//! row owned by someone else looks exactly like a missing one.

pub mod entity;


use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use tales_core::StoreError;
use tales_core::domain::{NewPost, Post, PostPatch};
use tales_core::ports::{PostQuery, PostStore, SortOrder};

use entity::post::{self, Entity as PostEntity};
use entity::profile::{self, Entity as ProfileEntity};

/// Connection settings for the hosted Postgres database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Read `DATABASE_URL` and pool sizes; `None` when no URL is set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;
        Some(Self {
            url,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

/// PostgreSQL implementation of `PostStore`.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Open a pooled connection.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let db = Database::connect(opts).await.map_err(store_error)?;
        tracing::info!(pool = config.max_connections, "Post database connected");
        Ok(Self::new(db))
    }

    async fn profile_for(&self, user_id: Uuid) -> Result<Option<profile::Model>, StoreError> {
        ProfileEntity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(store_error)
    }

    async fn owned_row(&self, caller: Uuid, id: Uuid) -> Result<post::Model, StoreError> {
        PostEntity::find_by_id(id)
            .filter(post::Column::UserId.eq(caller))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or(StoreError::NotFound)
    }
}

fn store_error(err: DbErr) -> StoreError {
    match &err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => StoreError::NotFound,
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Connection(err.to_string()),
        _ => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message))
            | Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                StoreError::Constraint(message)
            }
            _ => StoreError::Query(err.to_string()),
        },
    }
}

/// Title and content may be patched but never blanked.
fn check_required(patch: &PostPatch) -> Result<(), StoreError> {
    let blank = |field: &Option<String>| field.as_deref().is_some_and(|v| v.trim().is_empty());
    if blank(&patch.title) || blank(&patch.content) {
        return Err(StoreError::Constraint(
            "title and content must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn query(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        tracing::debug!(author_id = ?query.author_id, "Querying posts");

        let mut select = PostEntity::find();
        if let Some(author_id) = query.author_id {
            select = select.filter(post::Column::UserId.eq(author_id));
        }
        select = match query.order {
            SortOrder::NewestFirst => select.order_by_desc(post::Column::CreatedAt),
            SortOrder::OldestFirst => select.order_by_asc(post::Column::CreatedAt),
        };

        if query.with_author {
            let rows = select
                .find_also_related(ProfileEntity)
                .all(&self.db)
                .await
                .map_err(store_error)?;
            Ok(rows
                .into_iter()
                .map(|(post, profile)| post.into_post(profile))
                .collect())
        } else {
            let rows = select.all(&self.db).await.map_err(store_error)?;
            Ok(rows.into_iter().map(|post| post.into_post(None)).collect())
        }
    }

    async fn fetch(&self, id: Uuid) -> Result<Post, StoreError> {
        let (post, profile) = PostEntity::find_by_id(id)
            .find_also_related(ProfileEntity)
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or(StoreError::NotFound)?;
        Ok(post.into_post(profile))
    }

    async fn insert(&self, row: NewPost) -> Result<Post, StoreError> {
        let model = post::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(row.author_id),
            title: Set(row.title),
            content: Set(row.content),
            destination: Set(row.destination),
            image_url: Set(row.image_url),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        let profile = self.profile_for(model.user_id).await?;
        Ok(model.into_post(profile))
    }

    async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        patch: PostPatch,
    ) -> Result<Post, StoreError> {
        let existing = self.owned_row(caller, id).await?;
        check_required(&patch)?;

        let model = if patch.is_empty() {
            existing
        } else {
            let mut active: post::ActiveModel = existing.into();
            if let Some(title) = patch.title {
                active.title = Set(title);
            }
            if let Some(content) = patch.content {
                active.content = Set(content);
            }
            if let Some(destination) = patch.destination {
                active.destination = Set(destination);
            }
            if let Some(image_url) = patch.image_url {
                active.image_url = Set(image_url);
            }
            active.update(&self.db).await.map_err(store_error)?
        };

        let profile = self.profile_for(model.user_id).await?;
        Ok(model.into_post(profile))
    }

    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), StoreError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::UserId.eq(caller))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
