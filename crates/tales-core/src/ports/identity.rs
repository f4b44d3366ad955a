//! Identity ports. Credentials are issued by the hosted backend; this side
//! only reads the current identity and verifies session tokens.

use async_trait::async_trait;
use uuid::Uuid;

/// Source of the currently authenticated user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user's id, or `None`.
    async fn current_user(&self) -> Option<Uuid>;
}

/// Claims carried by a hosted-backend access token.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: i64,
}

/// Verifies access tokens issued by the hosted backend.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
