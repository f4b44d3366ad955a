//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tales_core::content::{self, ContentBlock};
use tales_core::domain::{EXCERPT_LENGTH, Post, PostDraft, PostPatch};

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<CreatePostRequest> for PostDraft {
    fn from(req: CreatePostRequest) -> Self {
        PostDraft {
            title: req.title,
            content: req.content,
            destination: req.destination,
            image_url: req.image_url,
        }
        .normalized()
    }
}

/// Body of `PUT /api/posts/{id}`.
///
/// Omitted fields stay as they are. An empty `destination` or `image_url`
/// clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        let mut patch = PostPatch::new();
        if let Some(title) = req.title {
            patch = patch.title(title);
        }
        if let Some(content) = req.content {
            patch = patch.content(content);
        }
        if let Some(destination) = req.destination {
            patch = patch.destination(Some(destination));
        }
        if let Some(image_url) = req.image_url {
            patch = patch.image_url(Some(image_url));
        }
        patch
    }
}

/// Query string of `GET /api/posts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Post as shown on a feed card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub destination: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            excerpt: post.excerpt(EXCERPT_LENGTH),
            destination: post.destination.clone(),
            image_url: post.image_url.clone(),
            created_at: post.created_at,
            author: author_of(post),
        }
    }
}

/// Full post for the detail page.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub blocks: Vec<ContentBlock>,
    pub destination: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
}

impl From<Post> for PostDetail {
    fn from(post: Post) -> Self {
        let author = author_of(&post);
        Self {
            id: post.id,
            blocks: content::render(&post.content),
            title: post.title,
            content: post.content,
            destination: post.destination,
            image_url: post.image_url,
            created_at: post.created_at,
            author,
        }
    }
}

/// Response of `GET /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub query: String,
    pub count: usize,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationsResponse {
    pub destinations: Vec<String>,
}

fn author_of(post: &Post) -> AuthorResponse {
    AuthorResponse {
        id: post.author_id,
        name: post.author.as_ref().map(|a| a.name.clone()),
        email: post.author.as_ref().map(|a| a.email.clone()),
    }
}
