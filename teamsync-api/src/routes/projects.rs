/// Project endpoints
///
/// # Endpoints
///
/// - `POST   /projects` - Create a project (caller becomes owner)
/// - `GET    /projects` - List caller's own projects
/// - `DELETE /projects/:id` - Delete a project (owner only; cascades)

use crate::{app::AppState, error::ApiResult, routes::require_owner};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use teamsync_shared::{
    auth::middleware::CurrentUser,
    models::project::{CreateProject, Project},
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Create a project owned by the caller
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = Project::create(
        &state.db,
        user.id(),
        CreateProject {
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    Ok(Json(project))
}

/// List the caller's own projects
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_by_owner(&state.db, user.id()).await?;

    Ok(Json(projects))
}

/// Delete a project
///
/// Owner only. Tasks and memberships are removed by the storage-layer
/// cascade.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = require_owner(&state.db, project_id, &user).await?;

    Project::delete(&state.db, project.id).await?;

    Ok(Json(serde_json::json!({
        "message": format!("Project '{}' deleted", project.title)
    })))
}
