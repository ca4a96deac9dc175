/// Project membership model and database operations
///
/// This module provides the Member model binding users to projects with a
/// role. It is the membership store behind the member-management and
/// invite endpoints.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('owner', 'admin', 'editor', 'viewer', 'member');
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role member_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// The composite primary key enforces the at-most-one-membership-per
/// (project, user) invariant at the storage layer. Two ways in exist with
/// deliberately different duplicate handling:
///
/// - [`Member::create`] (owner-initiated add): a duplicate is a unique
///   violation the caller surfaces as a conflict.
/// - [`Member::get_or_create`] (invite redemption): a duplicate returns
///   the existing row unchanged, making redemption retry-safe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Membership roles
///
/// A closed set, enforced at deserialization and by the Postgres enum
/// type. Roles are stored and mutable, but no task or project access check
/// consults them yet; authorization remains strict-ownership. The rank
/// helpers below exist for that future wiring, nothing routes through
/// them today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Full control over the project
    Owner,

    /// Can manage members and tasks
    Admin,

    /// Can create and edit tasks
    Editor,

    /// Read-only access
    Viewer,

    /// Baseline membership, assigned on invite redemption
    Member,
}

impl MemberRole {
    /// Converts the role to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Admin => "admin",
            MemberRole::Editor => "editor",
            MemberRole::Viewer => "viewer",
            MemberRole::Member => "member",
        }
    }

    /// Checks if this role ranks at least as high as `required`
    ///
    /// Hierarchy: Owner > Admin > Editor > Member > Viewer
    pub fn has_permission(&self, required: &MemberRole) -> bool {
        self.rank() >= required.rank()
    }

    fn rank(&self) -> u8 {
        match self {
            MemberRole::Owner => 5,
            MemberRole::Admin => 4,
            MemberRole::Editor => 3,
            MemberRole::Member => 2,
            MemberRole::Viewer => 1,
        }
    }
}

/// Role assigned when a membership is created by redeeming an invite
pub const INVITE_DEFAULT_ROLE: MemberRole = MemberRole::Member;

/// Membership record binding a user to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: MemberRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Membership joined with user identity fields, for listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberWithUser {
    /// User ID
    pub user_id: Uuid,

    /// User display name
    pub name: String,

    /// User email
    pub email: String,

    /// Role within the project
    pub role: MemberRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Creates a new membership (owner-initiated add)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The membership already exists (unique constraint violation on the
    ///   composite primary key; concurrent duplicate adds collapse to one
    ///   row and one violation)
    /// - Project or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Self, sqlx::Error> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO project_members (project_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING project_id, user_id, role, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Finds a specific membership
    pub async fn find(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT project_id, user_id, role, created_at
            FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Idempotent join used by invite redemption
    ///
    /// A single conditional insert: if the membership already exists the
    /// insert is a no-op and the existing row is returned with its original
    /// role and timestamp. Redeeming the same invite twice therefore yields
    /// the same membership state both times, with no duplicate and no
    /// error.
    pub async fn get_or_create(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Self, sqlx::Error> {
        let inserted = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO project_members (project_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (project_id, user_id) DO NOTHING
            RETURNING project_id, user_id, role, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(member) => Ok(member),
            // Conflict path: the row existed already (or was inserted by a
            // concurrent redeem); fetch it.
            None => Self::find(pool, project_id, user_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Updates a member's role
    ///
    /// # Returns
    ///
    /// The updated membership if found, None if no such membership exists
    pub async fn update_role(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            UPDATE project_members
            SET role = $3
            WHERE project_id = $1 AND user_id = $2
            RETURNING project_id, user_id, role, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Deletes a membership (removes user from project)
    ///
    /// # Returns
    ///
    /// True if a membership was deleted, false if it didn't exist
    pub async fn delete(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of a project with user identity fields
    ///
    /// Ordered by join time for a stable listing.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberWithUser>(
            r#"
            SELECT m.user_id, u.name, u.email, m.role, m.created_at
            FROM project_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.project_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}
