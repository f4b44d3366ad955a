//! # Tales Core
//!
//! The domain layer of Travel Tales.
//! This crate holds the post model, the ports the hosted backend must
//! satisfy, the cached post repository and the feed search filter.
//! It has no infrastructure dependencies.

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;
pub mod repository;
pub mod search;

pub use error::{DomainError, ErrorKind, RepositoryError, StoreError};
pub use repository::PostRepository;
