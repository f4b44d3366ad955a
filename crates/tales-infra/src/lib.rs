//! # Tales Infrastructure
//!
//! Concrete implementations of the ports defined in `tales-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory adapters only
//! - `postgres` - PostgreSQL post store via SeaORM
//! - `auth` - verification of hosted-backend JWT access tokens

pub mod auth;
pub mod notify;
pub mod store;

// Re-exports - In-Memory
pub use auth::{FixedIdentity, SessionIdentity};
pub use notify::BroadcastNotifier;
pub use store::InMemoryPostStore;

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenVerifier};

#[cfg(feature = "postgres")]
pub use store::{DatabaseConfig, PostgresPostStore};
