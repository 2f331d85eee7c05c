//! Organization routes
//!
//! Public company pages and team management for owners and admins.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{Created, DataResponse, NoContent};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::organizations::{
    AddMemberRequest, CompanyPageResponse, MemberResponse, MemberRole, Organization,
};
use crate::error::ApiError;
use crate::routes::profiles::fetch_profile;

/// Database row for organization
#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    slug: String,
    name: String,
    description: Option<String>,
    website: Option<String>,
    logo_url: Option<String>,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            website: row.website,
            logo_url: row.logo_url,
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

/// Database row for member listing
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    slug: String,
    full_name: Option<String>,
    title: Option<String>,
    avatar_url: Option<String>,
    member_role: Option<String>,
}

impl From<MemberRow> for MemberResponse {
    fn from(row: MemberRow) -> Self {
        Self {
            profile_id: row.id,
            slug: row.slug,
            full_name: row.full_name,
            title: row.title,
            avatar_url: row.avatar_url,
            role: row
                .member_role
                .as_deref()
                .map(MemberRole::from_db)
                .unwrap_or_default(),
        }
    }
}

const MEMBER_COLUMNS: &str = "id, slug, full_name, title, avatar_url, member_role";

async fn fetch_members(db: &PgPool, organization_id: Uuid) -> Result<Vec<MemberResponse>, ApiError> {
    let rows = sqlx::query_as::<_, MemberRow>(&format!(
        r#"
        SELECT {} FROM profiles
        WHERE organization_id = $1
        ORDER BY CASE member_role WHEN 'owner' THEN 0 WHEN 'admin' THEN 1 ELSE 2 END,
                 full_name NULLS LAST, slug
        "#,
        MEMBER_COLUMNS
    ))
    .bind(organization_id)
    .fetch_all(db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to load members: {}", e)))?;

    Ok(rows.into_iter().map(MemberResponse::from).collect())
}

/// Caller's organization and role, or 403 when they have none
async fn caller_membership(state: &AppState, user_id: Uuid) -> Result<(Uuid, MemberRole), ApiError> {
    let profile = fetch_profile(&state.db, user_id).await?;
    match profile.organization_id {
        Some(org_id) => Ok((org_id, profile.member_role.unwrap_or_default())),
        None => Err(ApiError::forbidden("You are not part of an organization")),
    }
}

/// GET /companies/:slug
pub async fn get_company_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let org: Organization = sqlx::query_as::<_, OrganizationRow>(
        r#"
        SELECT id, slug, name, description, website, logo_url, owner_id, created_at
        FROM organizations WHERE slug = $1
        "#,
    )
    .bind(&slug)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to load organization: {}", e)))?
    .ok_or_else(|| ApiError::not_found("Company not found"))?
    .into();

    let members = fetch_members(&state.db, org.id).await?;

    Ok(Json(DataResponse::new(CompanyPageResponse {
        slug: org.slug,
        name: org.name,
        description: org.description,
        website: org.website,
        logo_url: org.logo_url,
        members,
    })))
}

/// GET /organization/members
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let (org_id, _) = caller_membership(&state, auth.user_id).await?;
    let members = fetch_members(&state.db, org_id).await?;
    Ok(Json(DataResponse::new(members)))
}

/// POST /organization/members
///
/// Attach an existing profile, found by email, to the caller's organization.
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::bad_request)?;

    let (org_id, role) = caller_membership(&state, auth.user_id).await?;
    if !role.can_manage_members() {
        return Err(ApiError::forbidden("Only owners and admins can add members"));
    }

    let candidate: Option<(Uuid, Option<Uuid>)> = sqlx::query_as(
        "SELECT id, organization_id FROM profiles WHERE lower(email) = lower($1)",
    )
    .bind(req.email.trim())
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to look up profile: {}", e)))?;

    let (member_id, current_org) =
        candidate.ok_or_else(|| ApiError::not_found("No profile with that email"))?;

    match current_org {
        Some(existing) if existing == org_id => {
            return Err(ApiError::conflict("Already a member of this organization"))
        }
        Some(_) => return Err(ApiError::conflict("Profile belongs to another organization")),
        None => {}
    }

    let row = sqlx::query_as::<_, MemberRow>(&format!(
        r#"
        UPDATE profiles
        SET organization_id = $2, member_role = $3, updated_at = NOW()
        WHERE id = $1 AND organization_id IS NULL
        RETURNING {}
        "#,
        MEMBER_COLUMNS
    ))
    .bind(member_id)
    .bind(org_id)
    .bind(req.role.as_str())
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to add member: {}", e)))?
    .ok_or_else(|| ApiError::conflict("Profile joined another organization"))?;

    state.cache.invalidate_profile(member_id, Some(&row.slug)).await;

    tracing::info!(
        organization_id = %org_id,
        member_id = %member_id,
        role = req.role.as_str(),
        added_by = %auth.user_id,
        "Member added"
    );

    Ok(Created(MemberResponse::from(row)))
}

/// DELETE /organization/members/:profile_id
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let (org_id, role) = caller_membership(&state, auth.user_id).await?;
    if !role.can_manage_members() {
        return Err(ApiError::forbidden("Only owners and admins can remove members"));
    }

    let target: Option<(String, Option<String>)> = sqlx::query_as(
        "SELECT slug, member_role FROM profiles WHERE id = $1 AND organization_id = $2",
    )
    .bind(profile_id)
    .bind(org_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to load member: {}", e)))?;

    let (slug, target_role) = target.ok_or_else(|| ApiError::not_found("Member not found"))?;

    if target_role.as_deref().map(MemberRole::from_db) == Some(MemberRole::Owner) {
        return Err(ApiError::conflict("The organization owner cannot be removed"));
    }

    sqlx::query(
        r#"
        UPDATE profiles
        SET organization_id = NULL, member_role = NULL, updated_at = NOW()
        WHERE id = $1 AND organization_id = $2
        "#,
    )
    .bind(profile_id)
    .bind(org_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to remove member: {}", e)))?;

    state.cache.invalidate_profile(profile_id, Some(&slug)).await;

    tracing::info!(
        organization_id = %org_id,
        member_id = %profile_id,
        removed_by = %auth.user_id,
        "Member removed"
    );

    Ok(NoContent)
}
