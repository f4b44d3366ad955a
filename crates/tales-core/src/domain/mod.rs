//! Domain entities - the core business objects.

mod author;
mod draft;
mod post;

pub use author::AuthorProfile;
pub use draft::{NewPost, PostDraft, PostPatch};
pub use post::{EXCERPT_LENGTH, Post};
