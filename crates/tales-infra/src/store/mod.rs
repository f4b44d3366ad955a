//! Post store implementations - in-memory and PostgreSQL.

mod memory;

pub use memory::InMemoryPostStore;

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub use postgres::{DatabaseConfig, PostgresPostStore};
