/// JWT token generation and validation module
///
/// This module provides JWT (JSON Web Token) functionality for TeamSync.
/// Tokens are signed using HS256 (HMAC-SHA256) with one process-wide secret
/// injected at startup.
///
/// # Token Purposes
///
/// Three token purposes share the signing mechanism but carry different
/// subjects and lifetimes. Every token embeds an explicit `purpose` claim,
/// and every consumer validates it: a password-reset token presented as an
/// access token is rejected even though both carry a user id.
///
/// - **Access**: subject is a user id, 30 minutes
/// - **Password reset**: subject is a user id, 15 minutes
/// - **Invite**: subject is a project id, 24 hours
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Validation**: signature, expiration, not-before, and issuer checks
/// - **Secret Management**: secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use teamsync_shared::auth::jwt::{create_token, verify_access_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes!!";
///
/// let token = create_token(&Claims::access(user_id), secret)?;
///
/// let claims = verify_access_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in and required of every token
const ISSUER: &str = "teamsync";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token (bad signature, malformed, wrong issuer, ...)
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is valid but minted for a different purpose
    #[error("Token purpose mismatch: expected {expected}, got {actual}")]
    PurposeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Token purpose discriminant
///
/// Serialized into the `purpose` claim and checked by every consumer, so a
/// token minted for one flow cannot be replayed in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// API authentication (subject: user id)
    Access,

    /// Password reset flow (subject: user id)
    PasswordReset,

    /// Project invite link (subject: project id)
    Invite,
}

impl TokenPurpose {
    /// Gets default expiration duration for the purpose
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenPurpose::Access => Duration::minutes(30),
            TokenPurpose::PasswordReset => Duration::minutes(15),
            TokenPurpose::Invite => Duration::minutes(1440),
        }
    }

    /// Gets the purpose as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "access",
            TokenPurpose::PasswordReset => "password_reset",
            TokenPurpose::Invite => "invite",
        }
    }
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user id, or project id for invite tokens)
/// - `iss`: Issuer (always "teamsync")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Custom Claims
///
/// - `purpose`: What the token may be used for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id for access/reset tokens, project id for invites
    pub sub: Uuid,

    /// Issuer, always "teamsync"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token purpose (custom claim)
    pub purpose: TokenPurpose,
}

impl Claims {
    fn new(sub: Uuid, purpose: TokenPurpose) -> Self {
        Self::with_expiration(sub, purpose, purpose.default_expiration())
    }

    /// Creates access-token claims for a user (30 minute TTL)
    pub fn access(user_id: Uuid) -> Self {
        Self::new(user_id, TokenPurpose::Access)
    }

    /// Creates password-reset claims for a user (15 minute TTL)
    pub fn password_reset(user_id: Uuid) -> Self {
        Self::new(user_id, TokenPurpose::PasswordReset)
    }

    /// Creates invite claims for a project (24 hour TTL)
    ///
    /// The token carries no recipient binding: it is a bearer capability,
    /// and any authenticated holder may redeem it.
    pub fn invite(project_id: Uuid) -> Self {
        Self::new(project_id, TokenPurpose::Invite)
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(sub: Uuid, purpose: TokenPurpose, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            purpose,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `TokenError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiration, not-before time, and issuer. Does
/// NOT check the purpose; use the purpose-specific wrappers below, which
/// every consumer is expected to go through.
///
/// # Errors
///
/// Returns `TokenError::Expired` for expired tokens and
/// `TokenError::ValidationError` for everything else that fails to decode.
/// Callers surface both identically to clients.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

fn verify_for_purpose(
    token: &str,
    secret: &str,
    expected: TokenPurpose,
) -> Result<Claims, TokenError> {
    let claims = verify_token(token, secret)?;

    if claims.purpose != expected {
        return Err(TokenError::PurposeMismatch {
            expected: expected.as_str(),
            actual: claims.purpose.as_str(),
        });
    }

    Ok(claims)
}

/// Validates a token and checks it was minted as an access token
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    verify_for_purpose(token, secret, TokenPurpose::Access)
}

/// Validates a token and checks it was minted for password reset
pub fn verify_password_reset_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    verify_for_purpose(token, secret, TokenPurpose::PasswordReset)
}

/// Validates a token and checks it was minted as a project invite
pub fn verify_invite_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    verify_for_purpose(token, secret, TokenPurpose::Invite)
}
