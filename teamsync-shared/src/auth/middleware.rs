/// Bearer-token authentication middleware for Axum
///
/// This is the identity resolver: it maps an inbound `Authorization:
/// Bearer <token>` header to a concrete user record and injects it into
/// request extensions, where handlers pick it up with Axum's `Extension`
/// extractor.
///
/// Resolution fails closed. A missing subject, a bad signature, an expired
/// token, a token minted for another purpose, and a subject id with no
/// matching user row are all collapsed into one externally visible 401; the
/// response never reveals which sub-case occurred.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware, Extension};
/// use teamsync_shared::auth::middleware::{create_auth_middleware, CurrentUser};
/// use sqlx::PgPool;
///
/// async fn handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.0.name)
/// }
///
/// fn protected(pool: PgPool) -> Router {
///     Router::new()
///         .route("/me", get(handler))
///         .layer(middleware::from_fn(create_auth_middleware(pool, "secret")))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt;
use crate::models::user::User;

/// The authenticated user, added to request extensions on success
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Gets the authenticated user's id
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

/// Error type for the authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Header present but the token did not resolve (malformed header,
    /// bad signature, expired, wrong purpose)
    InvalidToken,

    /// Token verified but its subject matches no user
    UnknownUser,

    /// Database error while loading the user
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials")
            }
            // Identical responses: callers must not be able to tell a bad
            // token from a token whose user no longer exists.
            AuthError::InvalidToken | AuthError::UnknownUser => {
                (StatusCode::UNAUTHORIZED, "Invalid or expired token")
            }
            AuthError::DatabaseError(msg) => {
                tracing::error!("Auth middleware database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": if status == StatusCode::UNAUTHORIZED { "unauthorized" } else { "internal_error" },
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Resolves a bearer header value to a user record
///
/// # Errors
///
/// Fails closed with `AuthError` on any malformed, expired, or
/// unresolvable token.
pub async fn resolve_user(
    pool: &PgPool,
    secret: &str,
    auth_header: Option<&str>,
) -> Result<User, AuthError> {
    let auth_header = auth_header.ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?;

    let claims =
        jwt::verify_access_token(token, secret).map_err(|_| AuthError::InvalidToken)?;

    let user = User::find_by_id(pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    Ok(user)
}

/// Authentication middleware
///
/// Validates the bearer token, loads the user, and adds `CurrentUser` to
/// request extensions.
pub async fn auth_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let user = resolve_user(&pool, &secret, auth_header.as_deref()).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Creates an authentication middleware closure
///
/// Helper that captures the pool and secret and returns a function usable
/// with `axum::middleware::from_fn`.
pub fn create_auth_middleware(
    pool: PgPool,
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(auth_middleware(pool, secret, req, next))
    }
}
