//! Public card routes
//!
//! Unauthenticated endpoints behind a profile's shareable URL: the card
//! itself, contact/calendar downloads, visit tracking and lead capture.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{Created, DataResponse, Download, NoContent};
use crate::app::AppState;
use crate::domain::analytics::RecordViewRequest;
use crate::domain::leads::{CaptureLeadRequest, LeadResponse};
use crate::domain::links::LinkResponse;
use crate::domain::profiles::{ProfileResponse, PublicProfileResponse};
use crate::error::ApiError;
use crate::export::{booking_ics, profile_vcard, vcard::vcard_filename, BookingEvent};
use crate::routes::leads::LeadRow;
use crate::routes::profiles::fetch_profile_by_slug;
use crate::services::cache::{keys as cache_keys, ttl as cache_ttl};

const MAX_REFERRER_LEN: usize = 512;

/// GET /p/:slug
pub async fn get_public_profile(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cache_key = cache_keys::public_profile(&slug);
    if let Some(cached) = state.cache.get::<PublicProfileResponse>(&cache_key).await {
        return Ok(Json(DataResponse::new(cached)));
    }

    let profile = fetch_profile_by_slug(&state.db, &slug).await?;
    let links = state.links.list_for_profile(profile.id).await?;

    let response = PublicProfileResponse {
        profile: ProfileResponse::from_profile(profile, &state.settings.public_profile_base_url),
        links: links.iter().map(LinkResponse::from).collect(),
    };

    let _ = state
        .cache
        .set_with_ttl(&cache_key, &response, cache_ttl::PUBLIC_PROFILE)
        .await;

    Ok(Json(DataResponse::new(response)))
}

/// GET /p/:slug/vcard
pub async fn download_vcard(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = fetch_profile_by_slug(&state.db, &slug).await?;
    let links = state.links.list_for_profile(profile.id).await?;

    Ok(Download::new(
        "text/vcard; charset=utf-8",
        vcard_filename(&profile),
        profile_vcard(&profile, &links),
    ))
}

#[derive(Debug, Deserialize)]
pub struct BookingParams {
    pub start: DateTime<Utc>,
    #[serde(default = "default_booking_minutes")]
    pub duration_minutes: u32,
}

fn default_booking_minutes() -> u32 {
    30
}

/// GET /p/:slug/booking.ics?start=...&duration_minutes=...
pub async fn download_booking(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<BookingParams>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = fetch_profile_by_slug(&state.db, &slug).await?;

    let event = BookingEvent {
        uid: Uuid::new_v4(),
        start: params.start,
        duration_minutes: params.duration_minutes,
        summary: format!("Meeting with {}", profile.display_name()),
    };
    let body = booking_ics(&event, Utc::now())?;

    Ok(Download::new(
        "text/calendar; charset=utf-8",
        format!("{}-booking.ics", profile.slug),
        body,
    ))
}

/// POST /p/:slug/views
pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    body: Option<Json<RecordViewRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let referrer = req
        .referrer
        .map(|r| r.chars().take(MAX_REFERRER_LEN).collect::<String>())
        .filter(|r| !r.is_empty());

    let result = sqlx::query(
        r#"
        INSERT INTO profile_views (profile_id, source, referrer)
        SELECT id, $2, $3 FROM profiles WHERE slug = $1
        "#,
    )
    .bind(&slug)
    .bind(req.source.as_str())
    .bind(&referrer)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to record view: {}", e)))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Profile not found"));
    }

    tracing::debug!(slug = %slug, source = req.source.as_str(), "Profile view recorded");
    Ok(NoContent)
}

/// POST /p/:slug/leads
pub async fn capture_lead(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(req): Json<CaptureLeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::bad_request)?;

    let profile = fetch_profile_by_slug(&state.db, &slug).await?;

    let row = sqlx::query_as::<_, LeadRow>(
        r#"
        INSERT INTO lead_captures (profile_id, name, email, phone, company, message)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, profile_id, name, email, phone, company, message, created_at
        "#,
    )
    .bind(profile.id)
    .bind(req.name.trim())
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.company)
    .bind(&req.message)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to save lead: {}", e)))?;

    if let Err(e) = state
        .cache
        .delete_pattern(&cache_keys::analytics_pattern(profile.id))
        .await
    {
        tracing::warn!(profile_id = %profile.id, error = %e, "Failed to invalidate analytics cache");
    }

    tracing::info!(profile_id = %profile.id, "Lead captured");
    Ok(Created(LeadResponse::from(crate::domain::leads::Lead::from(row))))
}
