//! JWT token issuance and validation.
//!
//! Tokens are self-contained: validity is determined entirely by the
//! signature and the embedded expiry, never by a server-side lookup.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in hours.
    pub token_expiry_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            token_expiry_hours: 24,
        }
    }
}

/// Errors that can occur during JWT operations.
///
/// Validation failures are terminal: the caller must treat the request
/// as unauthenticated, not retry, and not fall back to any other
/// credential source.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    Encoding(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token signature verification failed.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Token structure could not be parsed.
    #[error("token is malformed")]
    Malformed,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_expiry_hours", &self.config.token_expiry_hours)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues an access token for a user.
    ///
    /// Embeds the user ID, tenant ID, username, and role names as claims,
    /// and returns the signed token together with its expiry instant.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Encoding` if token generation fails.
    pub fn issue(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        username: &str,
        roles: Vec<String>,
    ) -> Result<(String, DateTime<Utc>), JwtError> {
        let expires_at = Utc::now() + self.token_lifetime();
        let claims = Claims::new(user_id, tenant_id, username, roles, expires_at);

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))?;

        Ok((token, expires_at))
    }

    /// Returns the configured token lifetime.
    ///
    /// Queryable independently of issuing, so callers can report expiry
    /// without parsing a token.
    #[must_use]
    pub fn token_lifetime(&self) -> Duration {
        Duration::hours(self.config.token_expiry_hours)
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired,
    /// `JwtError::InvalidSignature` if the signature check fails, and
    /// `JwtError::Malformed` if the structure cannot be parsed.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        // Expiry is exact: a token is invalid the moment now > exp.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            token_expiry_hours: 24,
        })
    }

    #[test]
    fn test_issue_returns_token_and_expiry() {
        let service = create_test_service();
        let before = Utc::now();

        let (token, expires_at) = service
            .issue(Uuid::new_v4(), Uuid::new_v4(), "alice", vec![])
            .unwrap();

        assert!(!token.is_empty());
        let expected = before + service.token_lifetime();
        assert!((expires_at - expected).num_seconds().abs() <= 1);
    }

    #[test]
    fn test_validate_roundtrip() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();
        let roles = vec!["Admin".to_string(), "User".to_string()];

        let (token, _) = service
            .issue(user_id, tenant_id, "alice", roles.clone())
            .unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.tenant_id, tenant_id);
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            token_expiry_hours: -1,
        });

        let (token, _) = service
            .issue(Uuid::new_v4(), Uuid::new_v4(), "alice", vec![])
            .unwrap();

        assert!(matches!(service.validate(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_tampered_payload_fails_signature_check() {
        let service = create_test_service();

        let (token_a, _) = service
            .issue(Uuid::new_v4(), Uuid::new_v4(), "alice", vec![])
            .unwrap();
        let (token_b, _) = service
            .issue(
                Uuid::new_v4(),
                Uuid::new_v4(),
                "mallory",
                vec!["Admin".to_string()],
            )
            .unwrap();

        // Splice token B's payload into token A: the signature no longer
        // matches the message.
        let parts_a: Vec<&str> = token_a.split('.').collect();
        let parts_b: Vec<&str> = token_b.split('.').collect();
        let forged = format!("{}.{}.{}", parts_a[0], parts_b[1], parts_a[2]);

        assert!(matches!(
            service.validate(&forged),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_key_fails_signature_check() {
        let service = create_test_service();
        let other = JwtService::new(JwtConfig {
            secret: "a-completely-different-secret".to_string(),
            token_expiry_hours: 24,
        });

        let (token, _) = service
            .issue(Uuid::new_v4(), Uuid::new_v4(), "alice", vec![])
            .unwrap();

        assert!(matches!(
            other.validate(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_malformed_token() {
        let service = create_test_service();
        assert!(matches!(
            service.validate("not.a.token"),
            Err(JwtError::Malformed)
        ));
        assert!(matches!(service.validate(""), Err(JwtError::Malformed)));
    }

    #[test]
    fn test_token_lifetime_matches_config() {
        let service = create_test_service();
        assert_eq!(service.token_lifetime(), Duration::hours(24));
    }
}
