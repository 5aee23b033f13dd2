use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::auth::{AuthenticationService, BcryptPasswordEncoder, JwtCodec, PgCredentialStore};
use crate::configuration::{DatabaseSettings, Settings};
use crate::error::AppError;

pub type PgAuthenticationService =
    AuthenticationService<PgCredentialStore, BcryptPasswordEncoder, JwtCodec>;

/// Build a connection pool; connections are opened on first use
pub fn get_connection_pool(configuration: &DatabaseSettings) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(&configuration.connection_string())?;
    Ok(pool)
}

/// Assemble the Postgres-backed authentication service from settings
pub fn build_authentication_service(settings: &Settings) -> Result<PgAuthenticationService, AppError> {
    settings.jwt.validate()?;

    let pool = get_connection_pool(&settings.database)?;
    tracing::info!(
        host = %settings.database.host,
        database = %settings.database.database_name,
        "Authentication service configured"
    );

    Ok(AuthenticationService::new(
        PgCredentialStore::new(pool),
        BcryptPasswordEncoder::new(),
        JwtCodec::new(&settings.jwt),
    ))
}
