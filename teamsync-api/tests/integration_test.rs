/// Integration tests for the TeamSync API
///
/// These tests verify the full system works end-to-end against a real
/// Postgres database:
/// - Signup/login/me flow
/// - Ownership gating and its non-leakage property
/// - Membership add/update/remove/list with the uniqueness invariant
/// - Invite mint/redeem with idempotent joins
/// - Token expiry and purpose confinement at the HTTP boundary
///
/// All tests are `#[ignore]`d; run them with a provisioned database:
///
/// ```bash
/// DATABASE_URL=... JWT_SECRET=... cargo test -p teamsync-api -- --ignored
/// ```

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::TestContext;
use serde_json::json;
use teamsync_shared::auth::jwt::{create_token, Claims, TokenPurpose};
use teamsync_shared::models::member::Member;
use teamsync_shared::models::project::Project;
use teamsync_shared::models::user::User;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_signup_login_me_flow() {
    let ctx = TestContext::new().await.unwrap();

    let email = format!("flow-{}@example.com", Uuid::new_v4());

    let (status, body) = ctx
        .request(
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "name": "Flow User",
                "email": email,
                "password": "Sup3r#Secret"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {}", body);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = ctx.request("GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["name"], "Flow User");

    let (status, _) = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": "Sup3r#Secret" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Wrong password must not leak which part was wrong
    let (status, _) = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": "Wrong#Passw0rd" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = User::find_by_email(&ctx.db, &email).await.unwrap().unwrap();
    User::delete(&ctx.db, user.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_unauthenticated_requests_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request("GET", "/projects", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// A password-reset token and an invite token both verify under the same
/// secret, but neither may act as an access token.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_non_access_tokens_rejected_as_bearer() {
    let ctx = TestContext::new().await.unwrap();

    let reset_token = create_token(
        &Claims::password_reset(ctx.owner.id),
        &ctx.config.jwt.secret,
    )
    .unwrap();
    let (status, _) = ctx.request("GET", "/auth/me", Some(&reset_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let invite_token =
        create_token(&Claims::invite(Uuid::new_v4()), &ctx.config.jwt.secret).unwrap();
    let (status, _) = ctx
        .request("GET", "/auth/me", Some(&invite_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// The ownership gate answers identically for a project that does not
/// exist and a project owned by someone else.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_owner_gate_does_not_leak_project_existence() {
    let mut ctx = TestContext::new().await.unwrap();

    let project = ctx.create_project(ctx.owner.id, "Private").await.unwrap();
    let outsider = ctx.create_user("Outsider").await.unwrap();
    let outsider_token = ctx.token_for(outsider.id);

    let payload = json!({ "user_id": outsider.id, "role": "editor" });

    let (missing_status, missing_body) = ctx
        .request(
            "POST",
            &format!("/projects/{}/members", Uuid::new_v4()),
            Some(&outsider_token),
            Some(payload.clone()),
        )
        .await;

    let (foreign_status, foreign_body) = ctx
        .request(
            "POST",
            &format!("/projects/{}/members", project.id),
            Some(&outsider_token),
            Some(payload),
        )
        .await;

    assert_eq!(missing_status, StatusCode::FORBIDDEN);
    assert_eq!(foreign_status, StatusCode::FORBIDDEN);
    assert_eq!(missing_body, foreign_body);

    ctx.cleanup().await.unwrap();
}

/// Only the owner can reach add, update, remove, and invite generation.
/// Listing stays open to any authenticated user.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_member_mutations_are_owner_only() {
    let mut ctx = TestContext::new().await.unwrap();

    let project = ctx.create_project(ctx.owner.id, "Gated").await.unwrap();
    let outsider = ctx.create_user("Outsider").await.unwrap();
    let outsider_token = ctx.token_for(outsider.id);

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/projects/{}/members", project.id),
            Some(&outsider_token),
            Some(json!({ "user_id": outsider.id, "role": "editor" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/projects/{}/members/{}", project.id, outsider.id),
            Some(&outsider_token),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/projects/{}/members/{}", project.id, outsider.id),
            Some(&outsider_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(
            "GET",
            &format!("/projects/{}/invite-link", project.id),
            Some(&outsider_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Read access is deliberately not owner-gated
    let (status, _) = ctx
        .request(
            "GET",
            &format!("/projects/{}/members", project.id),
            Some(&outsider_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

/// At most one membership per (user, project): the second add is a
/// defined conflict, and concurrent adds collapse to one row.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_duplicate_add_is_a_conflict() {
    let mut ctx = TestContext::new().await.unwrap();

    let project = ctx.create_project(ctx.owner.id, "Unique").await.unwrap();
    let member = ctx.create_user("Member").await.unwrap();

    let payload = json!({ "user_id": member.id, "role": "editor" });
    let uri = format!("/projects/{}/members", project.id);

    let (status, _) = ctx
        .request("POST", &uri, Some(&ctx.owner_token), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request("POST", &uri, Some(&ctx.owner_token), Some(payload))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Concurrent adds for a fresh pair race on the primary key: exactly
    // one wins, the other gets the same defined conflict.
    let second = ctx.create_user("Second").await.unwrap();
    let payload = json!({ "user_id": second.id, "role": "viewer" });
    let (a, b) = tokio::join!(
        ctx.request("POST", &uri, Some(&ctx.owner_token), Some(payload.clone())),
        ctx.request("POST", &uri, Some(&ctx.owner_token), Some(payload)),
    );
    let mut statuses = vec![a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let row = Member::find(&ctx.db, project.id, second.id)
        .await
        .unwrap();
    assert!(row.is_some());

    ctx.cleanup().await.unwrap();
}

/// End-to-end: owner mints an invite, a non-member redeems it twice and
/// ends up with exactly one "member"-role membership.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_invite_redeem_is_idempotent() {
    let mut ctx = TestContext::new().await.unwrap();

    let project = ctx.create_project(ctx.owner.id, "Open House").await.unwrap();

    let (status, body) = ctx
        .request(
            "GET",
            &format!("/projects/{}/invite-link", project.id),
            Some(&ctx.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "invite mint failed: {}", body);
    let invite_token = body["token"].as_str().unwrap().to_string();
    assert!(body["invite_link"]
        .as_str()
        .unwrap()
        .contains("/projects/join?token="));

    let joiner = ctx.create_user("Joiner").await.unwrap();
    let joiner_token = ctx.token_for(joiner.id);
    let join_uri = format!("/projects/join?token={}", invite_token);

    let (status, first) = ctx
        .request("POST", &join_uri, Some(&joiner_token), None)
        .await;
    assert_eq!(status, StatusCode::OK, "join failed: {}", first);
    assert_eq!(first["role"], "member");
    assert_eq!(first["project_id"], project.id.to_string());

    // Redeem the same token again: same membership state, no error
    let (status, second) = ctx
        .request("POST", &join_uri, Some(&joiner_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["joined_at"], first["joined_at"]);
    assert_eq!(second["role"], first["role"]);

    let members = Member::list_for_project(&ctx.db, project.id).await.unwrap();
    let joiner_rows: Vec<_> = members.iter().filter(|m| m.user_id == joiner.id).collect();
    assert_eq!(joiner_rows.len(), 1);

    ctx.cleanup().await.unwrap();
}

/// A syntactically valid invite past its expiry is rejected outright.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_expired_invite_rejected() {
    let mut ctx = TestContext::new().await.unwrap();

    let project = ctx.create_project(ctx.owner.id, "Stale").await.unwrap();
    let expired = create_token(
        &Claims::with_expiration(project.id, TokenPurpose::Invite, Duration::seconds(-3600)),
        &ctx.config.jwt.secret,
    )
    .unwrap();

    let joiner = ctx.create_user("Late Joiner").await.unwrap();
    let joiner_token = ctx.token_for(joiner.id);

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/projects/join?token={}", expired),
            Some(&joiner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(Member::find(&ctx.db, project.id, joiner.id)
        .await
        .unwrap()
        .is_none());

    ctx.cleanup().await.unwrap();
}

/// End-to-end: add with a role, update the role, and the listing shows
/// exactly one entry with the final role.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_add_update_role_and_list() {
    let mut ctx = TestContext::new().await.unwrap();

    let project = ctx.create_project(ctx.owner.id, "Roles").await.unwrap();
    let colleague = ctx.create_user("Colleague").await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/projects/{}/members", project.id),
            Some(&ctx.owner_token),
            Some(json!({ "user_id": colleague.id, "role": "editor" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "editor");

    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/projects/{}/members/{}", project.id, colleague.id),
            Some(&ctx.owner_token),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    let (status, body) = ctx
        .request(
            "GET",
            &format!("/projects/{}/members", project.id),
            Some(&ctx.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let entries: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .filter(|m| m["user_id"] == colleague.id.to_string())
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["role"], "admin");

    // A role outside the closed set never reaches the store
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/projects/{}/members/{}", project.id, colleague.id),
            Some(&ctx.owner_token),
            Some(json!({ "role": "superuser" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

/// Deleting a project takes its memberships and tasks with it.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL, JWT_SECRET)"]
async fn test_project_delete_cascades() {
    let mut ctx = TestContext::new().await.unwrap();

    let project = ctx.create_project(ctx.owner.id, "Doomed").await.unwrap();
    let member = ctx.create_user("Member").await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/projects/{}/members", project.id),
            Some(&ctx.owner_token),
            Some(json!({ "user_id": member.id, "role": "viewer" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/projects/{}", project.id),
            Some(&ctx.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert!(Project::find_by_id(&ctx.db, project.id)
        .await
        .unwrap()
        .is_none());
    assert!(Member::find(&ctx.db, project.id, member.id)
        .await
        .unwrap()
        .is_none());

    ctx.cleanup().await.unwrap();
}
