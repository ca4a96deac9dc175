/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/signup` - Register a new user (auto-login)
/// - `POST /auth/login` - Login and get an access token
/// - `GET  /auth/me` - Current user profile
/// - `POST /auth/request-password-reset` - Mint a reset link
/// - `POST /auth/reset-password` - Redeem a reset token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamsync_shared::{
    auth::{jwt, middleware::CurrentUser, password},
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (validated for strength below)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Token response returned by signup and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Access token (30 min)
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,

    /// Authenticated user ID
    pub user_id: Uuid,
}

/// Current user profile response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Account creation time
    pub created_at: DateTime<Utc>,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate)]
pub struct RequestPasswordResetRequest {
    /// Email of the account to reset
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Password reset link response
#[derive(Debug, Serialize)]
pub struct PasswordResetLinkResponse {
    /// Human-readable confirmation
    pub message: String,

    /// Link carrying the reset token, for delivery to the user
    pub reset_link: String,
}

/// Perform password reset request
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Reset token from the emailed link
    pub token: String,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Message-only response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

fn check_password_strength(password: &str) -> ApiResult<()> {
    password::validate_password_strength(password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })
}

/// Register a new user
///
/// Creates the account and logs the user straight in.
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;
    check_password_strength(&req.password)?;

    let password_hash = password::hash_password(&req.password)?;

    // Duplicate emails surface as a unique violation mapped to 409
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            name: req.name,
            password_hash,
        },
    )
    .await?;

    let access_token = jwt::create_token(&jwt::Claims::access(user.id), state.jwt_secret())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user_id: user.id,
    }))
}

/// Login
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials (unknown email and wrong
///   password are indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    User::update_last_login(&state.db, user.id).await?;

    let access_token = jwt::create_token(&jwt::Claims::access(user.id), state.jwt_secret())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user_id: user.id,
    }))
}

/// Current user profile
pub async fn me(Extension(user): Extension<CurrentUser>) -> ApiResult<Json<UserResponse>> {
    let user = user.0;

    Ok(Json(UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }))
}

/// Request a password reset link
///
/// Mints a short-lived reset token bound to the account and returns a link
/// carrying it. Delivery (email) is outside this service.
///
/// # Errors
///
/// - `404 Not Found`: No account with that email
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<RequestPasswordResetRequest>,
) -> ApiResult<Json<PasswordResetLinkResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User with this email does not exist".to_string()))?;

    let token = jwt::create_token(&jwt::Claims::password_reset(user.id), state.jwt_secret())?;

    let reset_link = format!("{}/auth/reset-password?token={}", state.public_url(), token);

    Ok(Json(PasswordResetLinkResponse {
        message: "Reset link generated successfully".to_string(),
        reset_link,
    }))
}

/// Perform a password reset
///
/// The token must have been minted for password reset; an access or invite
/// token presented here is rejected like any other invalid token.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or wrong-purpose token
/// - `404 Not Found`: Token subject no longer exists
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;
    check_password_strength(&req.new_password)?;

    let claims = jwt::verify_password_reset_token(&req.token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let password_hash = password::hash_password(&req.new_password)?;
    User::update_password(&state.db, user.id, &password_hash).await?;

    Ok(Json(MessageResponse {
        message: "Password has been reset successfully".to_string(),
    }))
}
