/// JWT Claims structure
///
/// Represents the payload of a JWT token containing user information
/// and standard JWT claims (RFC 7519).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// Which half of a session a token belongs to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Claims for access and refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// User email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Unique token ID
    pub jti: String,
    /// Token kind
    pub typ: TokenKind,
}

impl Claims {
    /// Create new claims with user information
    ///
    /// # Arguments
    /// * `user_id` - User's UUID
    /// * `email` - User's email address
    /// * `kind` - Access or refresh
    /// * `expiry_seconds` - Token expiration in seconds from now
    /// * `issuer` - Issuer identifier
    pub fn new(
        user_id: Uuid,
        email: String,
        kind: TokenKind,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email,
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
            jti: Uuid::new_v4().to_string(),
            typ: kind,
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `InvalidToken` if the subject is not a valid UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Auth(AuthError::InvalidToken))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let email = "test@example.com".to_string();
        let claims = Claims::new(user_id, email.clone(), TokenKind::Access, 3600, "test".to_string());

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, email);
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_each_claims_gets_unique_id() {
        let user_id = Uuid::new_v4();
        let first = Claims::new(user_id, "a@b.com".to_string(), TokenKind::Access, 60, "t".to_string());
        let second = Claims::new(user_id, "a@b.com".to_string(), TokenKind::Access, 60, "t".to_string());

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "test@example.com".to_string(), TokenKind::Refresh, 3600, "test".to_string());

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_invalid_user_id() {
        let mut claims = Claims::new(
            Uuid::new_v4(),
            "test@example.com".to_string(),
            TokenKind::Access,
            3600,
            "test".to_string(),
        );
        claims.sub = "invalid-uuid".to_string();

        let err = claims.user_id().unwrap_err();
        assert_eq!(err.auth_kind(), Some(AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_claims() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.com".to_string(), TokenKind::Access, -10, "t".to_string());
        assert!(claims.exp < chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.com".to_string(), TokenKind::Refresh, 60, "t".to_string());
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["typ"], "refresh");
    }
}
