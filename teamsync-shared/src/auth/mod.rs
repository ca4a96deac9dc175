/// Authentication and authorization utilities
///
/// This module provides the authentication stack for TeamSync:
///
/// - `password`: Argon2id password hashing and verification
/// - `jwt`: Signed, time-limited tokens (access, password reset, invite)
/// - `middleware`: Bearer-token authentication middleware for Axum

pub mod jwt;
pub mod middleware;
pub mod password;
