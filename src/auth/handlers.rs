use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        repo_types::User,
        services::is_valid_email,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(get_me))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if password.len() < 8 {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }
    Ok(())
}

async fn auth_response(
    state: &AppState,
    user: User,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = state.auth.issue_refresh_token(user.id, None).await?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.email = normalize_email(&payload.email);
    validate_credentials(&payload.email, &payload.password)?;

    let user = state.auth.register(&payload.email, &payload.password).await?;
    info!(user_id = %user.id, email = %user.email, "user registered");

    let response = auth_response(&state, user).await?;
    Ok((StatusCode::CREATED, response))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.email = normalize_email(&payload.email);
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    let user = state
        .auth
        .authenticate(&payload.email, &payload.password)
        .await?;
    info!(user_id = %user.id, email = %user.email, "user logged in");

    auth_response(&state, user).await
}

/// Rotate the presented refresh token: soft-expire it and hand out a fresh
/// pair. An expired or unknown token is rejected before anything mutates.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let token = state.auth.valid_refresh_token(&payload.refresh_token).await?;

    let user = User::find_by_id(&state.db, token.user_id)
        .await?
        .ok_or(AppError::RefreshTokenNotValid)?;

    state.auth.expire_refresh_token(token.uuid).await?;
    info!(user_id = %user.id, "refresh token rotated");

    auth_response(&state, user).await
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<StatusCode, AppError> {
    let token = state.auth.valid_refresh_token(&payload.refresh_token).await?;
    state.auth.expire_refresh_token(token.uuid).await?;
    info!(user_id = %token.user_id, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_trims_and_lowercases() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn credential_validation_rejects_bad_input() {
        assert!(validate_credentials("user@example.com", "longenough").is_ok());
        assert!(matches!(
            validate_credentials("not-an-email", "longenough"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_credentials("user@example.com", "short"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn public_user_serialization() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("id"));
    }
}
