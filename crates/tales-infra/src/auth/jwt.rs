//! Verification of hosted-backend access tokens (HS256 JWTs).

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use uuid::Uuid;

use tales_core::ports::{AuthError, SessionClaims, TokenVerifier};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret the hosted backend signs tokens with.
    pub secret: String,
    /// Expected `iss`, if the backend sets one.
    pub issuer: Option<String>,
    /// Expected `aud`.
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            issuer: None,
            audience: "authenticated".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());
        if secret == DEFAULT_SECRET {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET to the backend's signing secret.");
        }

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").ok(),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// Verifies access tokens and extracts the user id from `sub`.
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&config.audience]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(SessionClaims {
            user_id,
            email: data.claims.email,
            role: data.claims.role,
            exp: data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        aud: &'a str,
        exp: i64,
        email: &'a str,
        role: &'a str,
    }

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            issuer: None,
            audience: "authenticated".to_string(),
        }
    }

    fn token(secret: &str, sub: &str, aud: &str, exp_offset: TimeDelta) -> String {
        let claims = TestClaims {
            sub,
            aud,
            exp: (Utc::now() + exp_offset).timestamp(),
            email: "jane@example.com",
            role: "authenticated",
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let verifier = JwtTokenVerifier::new(config());
        let user_id = Uuid::new_v4();
        let token = token(
            "test-secret-key",
            &user_id.to_string(),
            "authenticated",
            TimeDelta::hours(1),
        );

        let claims = verifier.verify(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email.as_deref(), Some("jane@example.com"));
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn test_verify_expired_token() {
        let verifier = JwtTokenVerifier::new(config());
        let token = token(
            "test-secret-key",
            &Uuid::new_v4().to_string(),
            "authenticated",
            TimeDelta::hours(-2),
        );

        assert!(matches!(verifier.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_verify_wrong_secret_or_audience() {
        let verifier = JwtTokenVerifier::new(config());
        let sub = Uuid::new_v4().to_string();

        let forged = token("other-secret", &sub, "authenticated", TimeDelta::hours(1));
        assert!(matches!(verifier.verify(&forged), Err(AuthError::InvalidToken(_))));

        let anon = token("test-secret-key", &sub, "anon", TimeDelta::hours(1));
        assert!(verifier.verify(&anon).is_err());
    }

    #[test]
    fn test_verify_non_uuid_subject() {
        let verifier = JwtTokenVerifier::new(config());
        let token = token("test-secret-key", "not-a-uuid", "authenticated", TimeDelta::hours(1));

        assert!(matches!(verifier.verify(&token), Err(AuthError::InvalidToken(_))));
    }
}
