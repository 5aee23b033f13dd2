/// JWT Token Generation and Validation
///
/// Creates signed access and refresh tokens for a user and decodes them back
/// into claims.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, TokenKind};
use crate::configuration::JwtSettings;
use crate::domain::User;
use crate::error::{AppError, AuthError};

/// Token codec used by the authentication service
pub trait TokenCodec: Send + Sync {
    /// Create a short-lived access token for a user
    fn create_access_token(&self, user: &User) -> Result<String, AppError>;

    /// Create a long-lived refresh token for a user
    fn create_refresh_token(&self, user: &User) -> Result<String, AppError>;

    /// Validate a token and extract its claims
    ///
    /// # Errors
    /// Returns `InvalidToken` if the token is blank, malformed, tampered with or expired
    fn decode(&self, token: &str) -> Result<Claims, AppError>;
}

/// HS256 codec keyed by the configured secret
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtSettings,
}

impl JwtCodec {
    pub fn new(config: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Verify issuer matches configuration
        validation.set_issuer(&[&config.issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config: config.clone(),
        }
    }

    fn sign(&self, user: &User, kind: TokenKind, expiry_seconds: i64) -> Result<String, AppError> {
        let claims = Claims::new(
            user.id,
            user.email.clone(),
            kind,
            expiry_seconds,
            self.config.issuer.clone(),
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}

impl TokenCodec for JwtCodec {
    fn create_access_token(&self, user: &User) -> Result<String, AppError> {
        self.sign(user, TokenKind::Access, self.config.access_token_expiry)
    }

    fn create_refresh_token(&self, user: &User) -> Result<String, AppError> {
        self.sign(user, TokenKind::Refresh, self.config.refresh_token_expiry)
    }

    fn decode(&self, token: &str) -> Result<Claims, AppError> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken.into());
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("JWT validation error: {}", e);
                AppError::Auth(AuthError::InvalidToken)
            })
    }
}
