//! Email-only authentication endpoints.
//!
//! There are no passwords. Login issues a short-lived bearer token whose
//! SHA-256 hash is stored server-side; the plaintext token goes to the
//! client once and is never persisted.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{generate_token, hash_token, ApiContext, UserContext};
use crate::db::repository::token::{insert_token, purge_expired_tokens, TOKEN_TTL_MINUTES};
use crate::db::repository::user::{get_user, get_user_by_email, insert_user, touch_last_login};
use crate::models::User;

const TEST_USER_EMAIL: &str = "test@example.com";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in_minutes: i64,
    pub user: User,
}

/// POST /auth/login
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email is required".into()));
    }

    let conn = ctx.open_db()?;
    let user = get_user_by_email(&conn, &email)?
        .ok_or_else(|| ApiError::NotFound(format!("No account for {email}")))?;

    // Opportunistic cleanup, keeps the token table from growing unbounded
    purge_expired_tokens(&conn)?;

    let token = generate_token();
    insert_token(&conn, &hash_token(&token), &user.id)?;
    touch_last_login(&conn, &user.id)?;

    tracing::info!(user = %user.email, "Login successful");

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer",
        expires_in_minutes: TOKEN_TTL_MINUTES,
        user,
    }))
}

/// GET /auth/me
pub async fn me(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<User>, ApiError> {
    let conn = ctx.open_db()?;
    let user = get_user(&conn, &user.user_id)?.ok_or(ApiError::Unauthorized)?;
    Ok(Json(user))
}

/// POST /auth/create-test-user
///
/// Development convenience. Idempotent: returns the existing account
/// when it was already created.
pub async fn create_test_user(State(ctx): State<ApiContext>) -> Result<Json<User>, ApiError> {
    let conn = ctx.open_db()?;
    if let Some(existing) = get_user_by_email(&conn, TEST_USER_EMAIL)? {
        return Ok(Json(existing));
    }
    let user = insert_user(&conn, TEST_USER_EMAIL, "Test", "User")?;
    tracing::info!(user = %user.email, "Test user created");
    Ok(Json(user))
}
