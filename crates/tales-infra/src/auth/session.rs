//! In-process identities.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use tales_core::ports::{IdentityProvider, SessionClaims};

/// Client-side session: whoever signed in last on this process.
#[derive(Default)]
pub struct SessionIdentity {
    user: RwLock<Option<Uuid>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sign_in(&self, user_id: Uuid) {
        *self.user.write().await = Some(user_id);
        tracing::info!(user_id = %user_id, "Signed in");
    }

    pub async fn sign_out(&self) {
        if let Some(user_id) = self.user.write().await.take() {
            tracing::info!(user_id = %user_id, "Signed out");
        }
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_user(&self) -> Option<Uuid> {
        *self.user.read().await
    }
}

/// An identity resolved up front, e.g. from a verified request token.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedIdentity(pub Option<Uuid>);

impl FixedIdentity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(user_id: Uuid) -> Self {
        Self(Some(user_id))
    }
}

impl From<&SessionClaims> for FixedIdentity {
    fn from(claims: &SessionClaims) -> Self {
        Self::user(claims.user_id)
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user(&self) -> Option<Uuid> {
        self.0
    }
}
