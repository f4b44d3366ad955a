//! Ports - trait definitions for the hosted backend and the view layer.
//! Infrastructure crates implement these.

mod identity;
mod notify;
mod post_store;

pub use identity::{AuthError, IdentityProvider, SessionClaims, TokenVerifier};
pub use notify::{Notification, NotificationVariant, Notifier};
pub use post_store::{PostQuery, PostStore, SortOrder};
