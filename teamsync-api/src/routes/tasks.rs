/// Task endpoints
///
/// Tasks carry no authorization of their own: every operation re-derives
/// access from the owning project. Project-scoped routes gate on the
/// project directly; task-id routes join through it. In both cases a
/// missing resource and someone else's resource read the same.
///
/// # Endpoints
///
/// - `POST   /projects/:id/tasks` - Create a task (owner only)
/// - `GET    /projects/:id/tasks` - List tasks (owner only)
/// - `PATCH  /tasks/:id` - Update a task (owner only, via project)
/// - `DELETE /tasks/:id` - Delete a task (owner only, via project)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use teamsync_shared::{
    auth::middleware::CurrentUser,
    models::{
        project::Project,
        task::{CreateTask, Task, UpdateTask},
    },
};
use uuid::Uuid;

/// Create a task in a project
///
/// # Errors
///
/// - `404 Not Found`: Project absent or not owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTask>,
) -> ApiResult<Json<Task>> {
    Project::find_owned(&state.db, project_id, user.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let task = Task::create(&state.db, project_id, req).await?;

    Ok(Json(task))
}

/// List tasks in a project
///
/// # Errors
///
/// - `404 Not Found`: Project absent or not owned by the caller
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    Project::find_owned(&state.db, project_id, user.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let tasks = Task::list_by_project(&state.db, project_id).await?;

    Ok(Json(tasks))
}

/// Update a task
///
/// # Errors
///
/// - `404 Not Found`: Task absent or its project not owned by the caller
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    Task::find_owned(&state.db, task_id, user.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task = Task::update(&state.db, task_id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: Task absent or its project not owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    Task::find_owned(&state.db, task_id, user.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Task::delete(&state.db, task_id).await?;

    Ok(Json(serde_json::json!({ "message": "Task deleted successfully" })))
}
