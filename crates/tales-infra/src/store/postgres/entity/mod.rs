//! SeaORM entities for the hosted tables.

pub mod post;
pub mod profile;
