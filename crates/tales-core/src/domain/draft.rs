//! Write-side payloads: the author's draft, the store insert row and the
//! partial update patch.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::Post;
use crate::error::DomainError;

const MISSING_FIELDS: &str = "Please fill in both title and content.";

/// A story as typed by its author, before it reaches the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub destination: Option<String>,
    pub image_url: Option<String>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            destination: None,
            image_url: None,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Drop blank optional fields so the store never sees `""`.
    pub fn normalized(mut self) -> Self {
        self.destination = non_blank(self.destination);
        self.image_url = non_blank(self.image_url);
        self
    }

    /// Check the form-level rules. The repository does not re-run these.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(DomainError::Validation(MISSING_FIELDS.to_string()));
        }
        if let Some(url) = self.image_url.as_deref() {
            validate_image_url(url)?;
        }
        Ok(())
    }
}

/// Row payload handed to the store on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub destination: Option<String>,
    pub image_url: Option<String>,
}

impl NewPost {
    pub fn from_draft(draft: PostDraft, author_id: Uuid) -> Self {
        Self {
            author_id,
            title: draft.title,
            content: draft.content,
            destination: draft.destination,
            image_url: draft.image_url,
        }
    }
}

/// Partial update of the editable fields.
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub destination: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl PostPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn destination(mut self, destination: Option<String>) -> Self {
        self.destination = Some(non_blank(destination));
        self
    }

    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = Some(non_blank(image_url));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.destination.is_none()
            && self.image_url.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let blank = |field: &Option<String>| field.as_deref().is_some_and(|v| v.trim().is_empty());
        if blank(&self.title) || blank(&self.content) {
            return Err(DomainError::Validation(MISSING_FIELDS.to_string()));
        }
        if let Some(Some(url)) = self.image_url.as_ref() {
            validate_image_url(url)?;
        }
        Ok(())
    }

    /// Apply the patch to `post`. Identity fields are never touched.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(destination) = &self.destination {
            post.destination = destination.clone();
        }
        if let Some(image_url) = &self.image_url {
            post.image_url = image_url.clone();
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_image_url(raw: &str) -> Result<(), DomainError> {
    let url = Url::parse(raw)
        .map_err(|e| DomainError::Validation(format!("Invalid cover image URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DomainError::Validation(format!(
            "Cover image URL must use http or https, got {}",
            other
        ))),
    }
}
