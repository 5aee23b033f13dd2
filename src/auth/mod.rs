/// Authentication module
///
/// The authentication service and the three collaborators it is built from:
/// credential store, password verifier and token codec.

mod claims;
mod jwt;
mod password;
mod service;
mod store;

pub use claims::Claims;
pub use claims::TokenKind;
pub use jwt::JwtCodec;
pub use jwt::TokenCodec;
pub use password::BcryptPasswordEncoder;
pub use password::PasswordVerifier;
pub use service::AuthenticationService;
pub use store::CredentialStore;
pub use store::InMemoryCredentialStore;
pub use store::PgCredentialStore;
