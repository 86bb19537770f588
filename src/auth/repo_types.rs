use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub email: String,              // user email
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub created_at: OffsetDateTime, // creation timestamp
}

/// Server-side refresh token record. Rows are never deleted; a token is
/// revoked by moving `expires_at` into the past.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub uuid: Uuid,
    pub user_id: Uuid,
    pub refresh_token: String, // opaque 64-char alphanumeric value
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl RefreshToken {
    /// A token is valid iff its expiry is strictly in the future.
    pub fn is_valid(&self) -> bool {
        self.expires_at > OffsetDateTime::now_utc()
    }
}
