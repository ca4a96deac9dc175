/// Project membership and invite endpoints
///
/// Membership mutation is owner-only; listing is open to any authenticated
/// user. That asymmetry is deliberate: who is in a project is visible to
/// everyone who can authenticate, who gets in is the owner's call.
///
/// The invite flow is a bearer capability. The owner mints a signed token
/// whose only subject is the project id; whoever presents it joins. There
/// is no recipient binding, and redemption is retry-safe: redeeming twice
/// returns the same membership both times.
///
/// # Endpoints
///
/// - `POST   /projects/:id/members` - Add member (owner only)
/// - `GET    /projects/:id/members` - List members (authenticated)
/// - `PUT    /projects/:id/members/:user_id` - Update role (owner only)
/// - `DELETE /projects/:id/members/:user_id` - Remove member (owner only)
/// - `GET    /projects/:id/invite-link` - Mint invite token (owner only)
/// - `POST   /projects/join?token=` - Redeem invite (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::require_owner,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamsync_shared::{
    auth::{jwt, middleware::CurrentUser},
    models::{
        member::{Member, MemberRole, MemberWithUser, INVITE_DEFAULT_ROLE},
        project::Project,
        user::User,
    },
};
use uuid::Uuid;

/// Add member request
///
/// `role` deserializes against the closed role set; anything outside it is
/// rejected before the handler runs.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,

    /// Role to assign
    pub role: MemberRole,
}

/// Update member role request
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    /// New role
    pub role: MemberRole,
}

/// Membership joined with user identity, for responses
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    /// User ID
    pub user_id: Uuid,

    /// User display name
    pub name: String,

    /// User email
    pub email: String,

    /// Role within the project
    pub role: MemberRole,
}

impl From<MemberWithUser> for MemberResponse {
    fn from(m: MemberWithUser) -> Self {
        Self {
            user_id: m.user_id,
            name: m.name,
            email: m.email,
            role: m.role,
        }
    }
}

/// Invite link response
#[derive(Debug, Serialize)]
pub struct InviteLinkResponse {
    /// Link carrying the invite token
    pub invite_link: String,

    /// The invite token itself (24 h TTL)
    pub token: String,
}

/// Join query parameters
#[derive(Debug, Deserialize)]
pub struct JoinParams {
    /// Invite token
    pub token: String,
}

/// Join response
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    /// Joined project
    pub project_id: Uuid,

    /// Joining user
    pub user_id: Uuid,

    /// Assigned role
    pub role: MemberRole,

    /// When the membership was created (unchanged on repeat redemption)
    pub joined_at: DateTime<Utc>,

    /// Human-readable confirmation
    pub message: String,
}

/// Add a member to a project
///
/// Owner only. Adding someone who is already a member is a caller mistake
/// and surfaces as a conflict, unlike invite redemption which is
/// idempotent by contract.
///
/// # Errors
///
/// - `403 Forbidden`: Caller does not own the project
/// - `404 Not Found`: Target user does not exist
/// - `409 Conflict`: User is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    require_owner(&state.db, project_id, &user).await?;

    let target = User::find_by_id(&state.db, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // A concurrent duplicate add loses the race on the primary key and
    // comes back as 409 rather than a second row.
    let member = Member::create(&state.db, project_id, req.user_id, req.role).await?;

    Ok(Json(MemberResponse {
        user_id: target.id,
        name: target.name,
        email: target.email,
        role: member.role,
    }))
}

/// List members of a project
///
/// Any authenticated caller may list; mutation stays owner-only.
///
/// # Errors
///
/// - `404 Not Found`: Project does not exist
pub async fn list_members(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let members = Member::list_for_project(&state.db, project_id).await?;

    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// Update a member's role
///
/// # Errors
///
/// - `403 Forbidden`: Caller does not own the project
/// - `404 Not Found`: No such membership
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    require_owner(&state.db, project_id, &user).await?;

    let member = Member::update_role(&state.db, project_id, user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    let target = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MemberResponse {
        user_id: target.id,
        name: target.name,
        email: target.email,
        role: member.role,
    }))
}

/// Remove a member from a project
///
/// # Errors
///
/// - `403 Forbidden`: Caller does not own the project
/// - `404 Not Found`: No such membership
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    require_owner(&state.db, project_id, &user).await?;

    let removed = Member::delete(&state.db, project_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Member removed" })))
}

/// Mint an invite link for a project
///
/// Owner only. The token's subject is the project id; possession alone
/// authorizes joining until expiry.
///
/// # Errors
///
/// - `403 Forbidden`: Caller does not own the project
pub async fn generate_invite_link(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<InviteLinkResponse>> {
    require_owner(&state.db, project_id, &user).await?;

    let token = jwt::create_token(&jwt::Claims::invite(project_id), state.jwt_secret())?;

    let invite_link = format!("{}/projects/join?token={}", state.public_url(), token);

    Ok(Json(InviteLinkResponse { invite_link, token }))
}

/// Redeem an invite token and join the project
///
/// Idempotent: if the caller is already a member, the existing membership
/// is returned unchanged. First-time joins get the default `member` role,
/// distinct from the roles settable via add/update.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or wrong-purpose token
/// - `404 Not Found`: The project behind the token no longer exists
pub async fn join_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<JoinParams>,
) -> ApiResult<Json<JoinResponse>> {
    let claims = jwt::verify_invite_token(&params.token, state.jwt_secret())?;
    let project_id = claims.sub;

    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let member =
        Member::get_or_create(&state.db, project.id, user.id(), INVITE_DEFAULT_ROLE).await?;

    Ok(Json(JoinResponse {
        project_id: member.project_id,
        user_id: member.user_id,
        role: member.role,
        joined_at: member.created_at,
        message: format!("You have joined the project '{}'", project.title),
    }))
}
