/// Domain types shared by the authentication service and its collaborators.

use serde::Serialize;
use uuid::Uuid;

use crate::auth::PasswordVerifier;

/// A registered user as held by the credential store
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    /// Refresh token issued at the last successful login
    pub refresh_token: Option<String>,
    pub deleted: bool,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            password_hash,
            refresh_token: None,
            deleted: false,
        }
    }

    /// Check a plaintext password against the stored hash.
    ///
    /// Deleted users never authenticate.
    pub fn authenticate(&self, password: &str, verifier: &dyn PasswordVerifier) -> bool {
        !self.deleted && verifier.matches(password, &self.password_hash)
    }
}

/// Access/refresh token pair handed back by login and reissue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlainVerifier;

    impl PasswordVerifier for PlainVerifier {
        fn matches(&self, password: &str, hash: &str) -> bool {
            password == hash
        }
    }

    #[test]
    fn test_new_user_has_no_refresh_token() {
        let user = User::new("a@b.com", "Alice", "hash".to_string());
        assert!(user.refresh_token.is_none());
        assert!(!user.deleted);
    }

    #[test]
    fn test_authenticate() {
        let user = User::new("a@b.com", "Alice", "secret".to_string());
        assert!(user.authenticate("secret", &PlainVerifier));
        assert!(!user.authenticate("wrong", &PlainVerifier));
    }

    #[test]
    fn test_deleted_user_never_authenticates() {
        let mut user = User::new("a@b.com", "Alice", "secret".to_string());
        user.deleted = true;
        assert!(!user.authenticate("secret", &PlainVerifier));
    }

    #[test]
    fn test_session_serializes_both_tokens() {
        let session = Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };
        let json = serde_json::to_value(&session).expect("Failed to serialize session");
        assert_eq!(json["access_token"], "access");
        assert_eq!(json["refresh_token"], "refresh");
    }
}
