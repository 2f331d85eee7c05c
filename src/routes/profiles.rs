//! Profile routes
//!
//! Own-profile management with Redis caching.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::organizations::MemberRole;
use crate::domain::profiles::{validate_slug, Profile, ProfileResponse, UpdateProfileRequest};
use crate::error::ApiError;
use crate::services::cache::{keys as cache_keys, ttl as cache_ttl};

pub(crate) const PROFILE_COLUMNS: &str = "id, slug, email, full_name, title, company, phone, website, bio, \
     avatar_url, organization_id, member_role, created_at, updated_at";

/// Database row for profile
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProfileRow {
    id: Uuid,
    slug: String,
    email: String,
    full_name: Option<String>,
    title: Option<String>,
    company: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    organization_id: Option<Uuid>,
    member_role: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            email: row.email,
            full_name: row.full_name,
            title: row.title,
            company: row.company,
            phone: row.phone,
            website: row.website,
            bio: row.bio,
            avatar_url: row.avatar_url,
            organization_id: row.organization_id,
            member_role: row.member_role.as_deref().map(MemberRole::from_db),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) async fn fetch_profile(db: &PgPool, profile_id: Uuid) -> Result<Profile, ApiError> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {} FROM profiles WHERE id = $1",
        PROFILE_COLUMNS
    ))
    .bind(profile_id)
    .fetch_optional(db)
    .await
    .map_err(|e| ApiError::failed("Failed to load profile", e))?
    .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(row.into())
}

pub(crate) async fn fetch_profile_by_slug(db: &PgPool, slug: &str) -> Result<Profile, ApiError> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {} FROM profiles WHERE slug = $1",
        PROFILE_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(db)
    .await
    .map_err(|e| ApiError::failed("Failed to load profile", e))?
    .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(row.into())
}

/// GET /profiles/me
///
/// Current user's profile, served from cache when possible.
pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let cache_key = cache_keys::profile(auth.user_id);

    if let Some(cached) = state.cache.get::<ProfileResponse>(&cache_key).await {
        return Ok(Json(DataResponse::new(cached)));
    }

    let profile = fetch_profile(&state.db, auth.user_id).await?;
    let response = ProfileResponse::from_profile(profile, &state.settings.public_profile_base_url);

    let _ = state
        .cache
        .set_with_ttl(&cache_key, &response, cache_ttl::PROFILE)
        .await;

    Ok(Json(DataResponse::new(response)))
}

/// PUT /profiles/me
///
/// Partial update; omitted fields keep their value.
pub async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(slug) = &req.slug {
        validate_slug(slug).map_err(ApiError::bad_request)?;
    }

    // Old slug's public page must be dropped from cache too
    let previous = fetch_profile(&state.db, auth.user_id).await?;

    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        r#"
        UPDATE profiles SET
            slug = COALESCE($2, slug),
            full_name = COALESCE($3, full_name),
            title = COALESCE($4, title),
            company = COALESCE($5, company),
            phone = COALESCE($6, phone),
            website = COALESCE($7, website),
            bio = COALESCE($8, bio),
            avatar_url = COALESCE($9, avatar_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        PROFILE_COLUMNS
    ))
    .bind(auth.user_id)
    .bind(&req.slug)
    .bind(&req.full_name)
    .bind(&req.title)
    .bind(&req.company)
    .bind(&req.phone)
    .bind(&req.website)
    .bind(&req.bio)
    .bind(&req.avatar_url)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ApiError::conflict("That profile URL is already taken")
        }
        other => ApiError::internal(format!("Failed to save profile: {}", other)),
    })?
    .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let profile: Profile = row.into();

    state
        .cache
        .invalidate_profile(auth.user_id, Some(&previous.slug))
        .await;
    if previous.slug != profile.slug {
        state
            .cache
            .invalidate_profile(auth.user_id, Some(&profile.slug))
            .await;
    }

    tracing::info!(profile_id = %auth.user_id, "Profile updated");

    let response = ProfileResponse::from_profile(profile, &state.settings.public_profile_base_url);
    Ok(Json(DataResponse::new(response)))
}
