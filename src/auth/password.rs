/// Password Hashing and Verification
///
/// Handles password hashing with bcrypt and password strength validation.

use std::sync::OnceLock;

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;
const DUMMY_PASSWORD: &str = "DummyPassword0";

/// Checks a plaintext password against a stored hash
pub trait PasswordVerifier: Send + Sync {
    fn matches(&self, password: &str, hash: &str) -> bool;

    /// Spend the same work as `matches` when there is no stored hash to check
    fn simulate_match(&self, _password: &str) {}
}

/// Bcrypt-backed password encoder
#[derive(Debug, Clone)]
pub struct BcryptPasswordEncoder {
    cost: u32,
    dummy_hash: OnceLock<Option<String>>,
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::with_cost(DEFAULT_COST)
    }
}

impl BcryptPasswordEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom work factor (bcrypt accepts 4..=31)
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Hash of a fixed password at this encoder's cost, computed on first use
    fn dummy_hash(&self) -> Option<&str> {
        self.dummy_hash
            .get_or_init(|| hash(DUMMY_PASSWORD, self.cost).ok())
            .as_deref()
    }

    /// Hash a password using bcrypt
    ///
    /// # Errors
    /// Returns error if:
    /// - Password fails validation (too short, weak, etc.)
    /// - Bcrypt hashing fails
    pub fn encode(&self, password: &str) -> Result<String, AppError> {
        validate_password_strength(password)?;

        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }
}

impl PasswordVerifier for BcryptPasswordEncoder {
    fn matches(&self, password: &str, hash: &str) -> bool {
        match verify(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                // A corrupt stored hash must not be distinguishable from a wrong password
                tracing::warn!("Password verification failed: {}", e);
                false
            }
        }
    }

    fn simulate_match(&self, password: &str) {
        if let Some(dummy) = self.dummy_hash() {
            let _ = verify(password, dummy);
        }
    }
}

/// Validate password strength requirements
///
/// Requirements:
/// - Minimum 8 characters
/// - Maximum 128 characters
/// - At least one digit
/// - At least one lowercase letter
/// - At least one uppercase letter
fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        )));
    }

    // bcrypt limitation and DoS prevention
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }

    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());

    if !has_digit || !has_lowercase || !has_uppercase {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            "password must contain at least one digit, one lowercase letter, and one uppercase letter"
                .to_string(),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> BcryptPasswordEncoder {
        BcryptPasswordEncoder::with_cost(4)
    }

    #[test]
    fn test_hash_password() {
        let password = "ValidPassword123";
        let hash = encoder().encode(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_password() {
        let password = "ValidPassword123";
        let hash = encoder().encode(password).expect("Failed to hash password");

        assert!(encoder().matches(password, &hash));
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = encoder().encode("ValidPassword123").expect("Failed to hash password");

        assert!(!encoder().matches("WrongPassword123", &hash));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!encoder().matches("ValidPassword123", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_dummy_hash_uses_configured_cost() {
        let encoder = encoder();
        encoder.simulate_match("AnyPassword1");

        let dummy = encoder.dummy_hash().expect("Dummy hash should be computed");
        assert!(dummy.starts_with("$2b$04$"));
        assert!(encoder.matches(DUMMY_PASSWORD, dummy));
    }

    #[test]
    fn test_invalid_cost_has_no_dummy_hash() {
        let encoder = BcryptPasswordEncoder::with_cost(2);
        encoder.simulate_match("AnyPassword1");
        assert!(encoder.dummy_hash().is_none());
    }

    #[test]
    fn test_too_short_password() {
        assert!(encoder().encode("Short1").is_err());
    }

    #[test]
    fn test_too_long_password() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1) + "A1";
        assert!(encoder().encode(&long_password).is_err());
    }

    #[test]
    fn test_missing_character_classes() {
        assert!(encoder().encode("NoDigitsPassword").is_err());
        assert!(encoder().encode("NOLOWERCASE1").is_err());
        assert!(encoder().encode("nouppercase1").is_err());
    }
}
