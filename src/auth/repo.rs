use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{RefreshToken, User};

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with hashed password. Surfaces the `users_email_key`
    /// unique violation unchanged so the caller can classify it.
    pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }
}

impl RefreshToken {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        token_value: &str,
        expires_at: OffsetDateTime,
    ) -> sqlx::Result<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (user_id, refresh_token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING uuid, user_id, refresh_token, expires_at, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(token_value)
        .bind(expires_at)
        .fetch_one(db)
        .await
    }

    /// Exact-match lookup by token value.
    pub async fn find_by_value(
        db: &PgPool,
        token_value: &str,
    ) -> sqlx::Result<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT uuid, user_id, refresh_token, expires_at, created_at, updated_at
            FROM refresh_tokens
            WHERE refresh_token = $1
            "#,
        )
        .bind(token_value)
        .fetch_optional(db)
        .await
    }

    /// Soft-expire: push `expires_at` into the past, keep the row.
    pub async fn expire(db: &PgPool, uuid: Uuid, expires_at: OffsetDateTime) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET expires_at = $2, updated_at = now()
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }
}
