//! # Tales Shared
//!
//! Request/response types for the Travel Tales HTTP surface.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
