use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use regex::Regex;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{RefreshToken, User};
use crate::error::AppError;

pub(crate) const REFRESH_TOKEN_LEN: usize = 64;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Random alphanumeric string from the OS CSPRNG.
pub(crate) fn generate_random_alphanum(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Credential verification and refresh-token lifecycle over an injected pool.
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    refresh_token_exp: Duration,
}

impl AuthService {
    pub fn new(db: PgPool, refresh_token_exp_secs: i64) -> Self {
        Self {
            db,
            refresh_token_exp: Duration::seconds(refresh_token_exp_secs),
        }
    }

    /// Register a new user. The `users.email` unique constraint is the single
    /// arbiter of duplicates, so a lost race still reports `DuplicateUser`.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let hash = hash_password(password)?;
        match User::create(&self.db, email, &hash).await {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!(email = %email, "registration for taken email");
                Err(AppError::DuplicateUser)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up by email and check the password. Unknown email and wrong
    /// password collapse into the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = User::find_by_email(&self.db, email).await? else {
            warn!(email = %email, "authentication for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "authentication with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Persist a refresh token for `user_id` and return its value. Generates
    /// a random 64-char value when the caller does not supply one.
    pub async fn issue_refresh_token(
        &self,
        user_id: Uuid,
        token_value: Option<String>,
    ) -> Result<String, AppError> {
        let token_value =
            token_value.unwrap_or_else(|| generate_random_alphanum(REFRESH_TOKEN_LEN));
        let expires_at = OffsetDateTime::now_utc() + self.refresh_token_exp;
        let token = RefreshToken::create(&self.db, user_id, &token_value, expires_at).await?;
        info!(user_id = %user_id, token_uuid = %token.uuid, "refresh token issued");
        Ok(token.refresh_token)
    }

    pub async fn get_refresh_token(
        &self,
        token_value: &str,
    ) -> Result<Option<RefreshToken>, AppError> {
        Ok(RefreshToken::find_by_value(&self.db, token_value).await?)
    }

    /// Soft-expire a token by dating its expiry one day into the past.
    pub async fn expire_refresh_token(&self, token_uuid: Uuid) -> Result<(), AppError> {
        let expires_at = OffsetDateTime::now_utc() - Duration::days(1);
        RefreshToken::expire(&self.db, token_uuid, expires_at).await?;
        info!(token_uuid = %token_uuid, "refresh token expired");
        Ok(())
    }

    /// Lookup + validity check for the session-renewal path. Missing and
    /// expired tokens are not distinguished.
    pub async fn valid_refresh_token(
        &self,
        token_value: &str,
    ) -> Result<RefreshToken, AppError> {
        match self.get_refresh_token(token_value).await? {
            Some(token) if token.is_valid() => Ok(token),
            Some(token) => {
                warn!(token_uuid = %token.uuid, "expired refresh token presented");
                Err(AppError::RefreshTokenNotValid)
            }
            None => Err(AppError::RefreshTokenNotValid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn generated_tokens_are_64_alphanumeric_chars() {
        let token = generate_random_alphanum(REFRESH_TOKEN_LEN);
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_tokens_are_distinct() {
        let a = generate_random_alphanum(REFRESH_TOKEN_LEN);
        let b = generate_random_alphanum(REFRESH_TOKEN_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@mail.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    async fn rendered(err: AppError) -> (StatusCode, axum::body::Bytes) {
        let response = err.into_response();
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        (parts.status, bytes)
    }

    #[sqlx::test]
    async fn duplicate_registration_yields_duplicate_user(pool: PgPool) {
        let auth = AuthService::new(pool, 3600);
        auth.register("taken@example.com", "password-one")
            .await
            .expect("first registration");
        let err = auth
            .register("taken@example.com", "password-two")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser));
    }

    #[sqlx::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable(pool: PgPool) {
        let auth = AuthService::new(pool, 3600);
        auth.register("known@example.com", "correct-password")
            .await
            .expect("registration");

        let wrong_password = auth
            .authenticate("known@example.com", "wrong-password")
            .await
            .unwrap_err();
        let unknown_email = auth
            .authenticate("unknown@example.com", "correct-password")
            .await
            .unwrap_err();

        let (status_a, body_a) = rendered(wrong_password).await;
        let (status_b, body_b) = rendered(unknown_email).await;
        assert_eq!(status_a, StatusCode::UNAUTHORIZED);
        assert_eq!(status_a, status_b);
        assert_eq!(body_a, body_b);
    }

    #[sqlx::test]
    async fn expired_token_fails_validity_check(pool: PgPool) {
        let auth = AuthService::new(pool, 3600);
        let user = auth
            .register("holder@example.com", "long-password")
            .await
            .expect("registration");
        let value = auth
            .issue_refresh_token(user.id, None)
            .await
            .expect("issue token");

        let token = auth
            .valid_refresh_token(&value)
            .await
            .expect("fresh token is valid");

        auth.expire_refresh_token(token.uuid).await.expect("expire");

        let err = auth.valid_refresh_token(&value).await.unwrap_err();
        assert!(matches!(err, AppError::RefreshTokenNotValid));

        // Soft expiry: the row survives, just dated into the past.
        let stored = auth
            .get_refresh_token(&value)
            .await
            .expect("lookup")
            .expect("row still present");
        assert!(!stored.is_valid());
    }

    #[sqlx::test]
    async fn caller_supplied_token_value_is_stored_verbatim(pool: PgPool) {
        let auth = AuthService::new(pool, 3600);
        let user = auth
            .register("fixed@example.com", "long-password")
            .await
            .expect("registration");
        let supplied = "f".repeat(REFRESH_TOKEN_LEN);
        let value = auth
            .issue_refresh_token(user.id, Some(supplied.clone()))
            .await
            .expect("issue token");
        assert_eq!(value, supplied);
        let stored = auth
            .get_refresh_token(&supplied)
            .await
            .expect("lookup")
            .expect("stored");
        assert_eq!(stored.user_id, user.id);
    }
}
