/// Credential Store
///
/// Looks users up by email or by their current refresh token, and records the
/// refresh token issued at login. Two backends:
/// - `PgCredentialStore` for Postgres (`users` table, see `migrations/`)
/// - `InMemoryCredentialStore` for tests and embedders without a database

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::User;
use crate::error::{AppError, DatabaseError};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user (deleted or not) by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Find the non-deleted user whose stored refresh token equals `refresh_token`
    async fn find_by_non_deleted_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<User>, AppError>;

    /// Overwrite the user's stored refresh token
    ///
    /// # Errors
    /// Returns `DatabaseError::NotFound` if the user does not exist
    async fn save_refresh_token(&self, user_id: Uuid, refresh_token: &str) -> Result<(), AppError>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, refresh_token, deleted
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_non_deleted_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, refresh_token, deleted
            FROM users
            WHERE refresh_token = $1 AND deleted = false
            "#,
        )
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn save_refresh_token(&self, user_id: Uuid, refresh_token: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(refresh_token)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", user_id)).into());
        }

        Ok(())
    }
}

/// In-process store; clones share the same users
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn get(&self, user_id: Uuid) -> Option<User> {
        self.users.read().await.get(&user_id).cloned()
    }

    /// Soft-delete a user; returns false if the user is unknown
    pub async fn mark_deleted(&self, user_id: Uuid) -> bool {
        match self.users.write().await.get_mut(&user_id) {
            Some(user) => {
                user.deleted = true;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_non_deleted_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| !u.deleted && u.refresh_token.as_deref() == Some(refresh_token))
            .cloned())
    }

    async fn save_refresh_token(&self, user_id: Uuid, refresh_token: &str) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        user.refresh_token = Some(refresh_token.to_string());
        Ok(())
    }
}
