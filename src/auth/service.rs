/// Authentication Service
///
/// Validates credentials, issues access/refresh token pairs and reissues
/// access tokens from a stored refresh token. Persistence, password hashing
/// and token signing are delegated to the collaborators passed to `new`.
/// Transaction boundaries belong to the caller.

use crate::auth::claims::Claims;
use crate::auth::jwt::TokenCodec;
use crate::auth::password::PasswordVerifier;
use crate::auth::store::CredentialStore;
use crate::domain::Session;
use crate::error::{AppError, AuthError, ErrorContext};

pub struct AuthenticationService<S, P, T> {
    store: S,
    passwords: P,
    tokens: T,
}

impl<S, P, T> AuthenticationService<S, P, T>
where
    S: CredentialStore,
    P: PasswordVerifier,
    T: TokenCodec,
{
    pub fn new(store: S, passwords: P, tokens: T) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Authenticate with email and password.
    ///
    /// On success the new refresh token is stored on the user, replacing any
    /// previous one.
    ///
    /// # Errors
    /// - `LoginFailed`: unknown email, wrong password or deleted account, all
    ///   reported the same way to prevent user enumeration
    /// - database or token-encoding errors from the collaborators
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let mut context = ErrorContext::new("user_login");

        let authenticated = match self.store.find_by_email(email).await? {
            Some(user) => {
                context = context.with_user_id(user.id.to_string());
                user.authenticate(password, &self.passwords).then_some(user)
            }
            None => {
                // Unknown emails pay the same hashing cost as wrong passwords
                self.passwords.simulate_match(password);
                None
            }
        };

        let user = match authenticated {
            Some(user) => user,
            None => {
                let err = AppError::Auth(AuthError::LoginFailed);
                context.log_error(&err);
                return Err(err);
            }
        };

        let access_token = self.tokens.create_access_token(&user)?;
        let refresh_token = self.tokens.create_refresh_token(&user)?;
        self.store.save_refresh_token(user.id, &refresh_token).await?;

        tracing::info!(
            request_id = %context.request_id,
            user_id = %user.id,
            "User logged in successfully"
        );

        Ok(Session {
            access_token,
            refresh_token,
        })
    }

    /// Decode a token into its claims. No side effects.
    ///
    /// # Errors
    /// `InvalidToken` for a blank, malformed, tampered or expired token
    pub fn parse_token(&self, access_token: &str) -> Result<Claims, AppError> {
        self.tokens.decode(access_token)
    }

    /// Issue a new access token for the holder of a stored refresh token.
    ///
    /// The refresh token is not rotated: the same value comes back in the
    /// session and the stored user is left untouched.
    ///
    /// # Errors
    /// `InvalidToken` if no non-deleted user holds this refresh token
    pub async fn reissue_access_token(&self, refresh_token: &str) -> Result<Session, AppError> {
        let context = ErrorContext::new("token_reissue");

        let user = if refresh_token.trim().is_empty() {
            None
        } else {
            self.store
                .find_by_non_deleted_refresh_token(refresh_token)
                .await?
        };

        let user = match user {
            Some(user) => user,
            None => {
                let err = AppError::Auth(AuthError::InvalidToken);
                context.log_error(&err);
                return Err(err);
            }
        };

        let access_token = self.tokens.create_access_token(&user)?;

        tracing::info!(
            request_id = %context.request_id,
            user_id = %user.id,
            "Access token reissued"
        );

        Ok(Session {
            access_token,
            refresh_token: refresh_token.to_string(),
        })
    }
}
