/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (signup, login, password reset)
/// - `projects`: Project CRUD
/// - `members`: Project membership management and invite protocol
/// - `tasks`: Task CRUD, gated through the owning project

use crate::error::{ApiError, ApiResult};
use sqlx::PgPool;
use teamsync_shared::{auth::middleware::CurrentUser, models::project::Project};
use uuid::Uuid;

pub mod auth;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;

/// The project ownership gate
///
/// Loads the project only if the caller owns it. A missing project and a
/// project owned by someone else produce the same `Forbidden` error, so
/// callers learn nothing about projects that aren't theirs. Applied before
/// every mutating project-scoped operation.
pub(crate) async fn require_owner(
    pool: &PgPool,
    project_id: Uuid,
    user: &CurrentUser,
) -> ApiResult<Project> {
    Project::find_owned(pool, project_id, user.id())
        .await?
        .ok_or_else(|| ApiError::Forbidden("You do not own this project".to_string()))
}
