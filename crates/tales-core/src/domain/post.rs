use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorProfile;

/// Default number of characters shown on a feed card.
pub const EXCERPT_LENGTH: usize = 150;

/// Post entity - a published travel story.
///
/// `id`, `author_id` and `created_at` are assigned once by the store and
/// never change afterwards. `author` is derived from the profile join and
/// may be missing when the profile row is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub destination: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub author: Option<AuthorProfile>,
}

impl Post {
    /// Author display name, if the profile join resolved.
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.name.as_str())
    }

    /// Whether `user_id` owns this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Content preview truncated to `max_chars` characters, with `...`
    /// appended when anything was cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        match self.content.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &self.content[..byte_idx]),
            None => self.content.clone(),
        }
    }
}
