use async_trait::async_trait;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::user_models::{Role, User};

/// Read-only user lookups needed by services that notify people.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Oldest account first.
    async fn find_by_role(&self, role: Role) -> Result<Vec<User>>;
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        position: Option<&str>,
        role: Role,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *"
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(position)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_role(&self, role: Role) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 ORDER BY created_at ASC"
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Returns `false` when no account uses `email` yet.
    pub async fn promote_to_admin(&self, email: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET role = $2, updated_at = NOW()
             WHERE lower(email) = lower($1) AND role <> $2"
        )
        .bind(email)
        .bind(Role::Admin.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.find_by_email(email).await?.is_some())
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        UserRepository::find_by_id(self, user_id).await
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>> {
        UserRepository::find_by_role(self, role).await
    }
}
