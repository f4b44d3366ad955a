//! Identity adapters.

mod session;

#[cfg(feature = "auth")]
mod jwt;

pub use session::{FixedIdentity, SessionIdentity};

#[cfg(feature = "auth")]
pub use jwt::{JwtConfig, JwtTokenVerifier};
