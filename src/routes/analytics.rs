//! Analytics routes

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::analytics::{
    fill_daily_series, window_start, AnalyticsSummary, SourceCount, SummaryParams, ViewSource,
};
use crate::error::ApiError;
use crate::services::cache::{keys as cache_keys, ttl as cache_ttl};

/// GET /analytics/summary?days=N
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let days = params.days().map_err(ApiError::bad_request)?;

    let cache_key = cache_keys::analytics(auth.user_id, days);
    if let Some(cached) = state.cache.get::<AnalyticsSummary>(&cache_key).await {
        return Ok(Json(DataResponse::new(cached)));
    }

    let start = window_start(Utc::now(), days);
    let since = start
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ApiError::internal("Invalid analytics window"))?
        .and_utc();

    let daily_counts: Vec<(NaiveDate, i64)> = sqlx::query_as(
        r#"
        SELECT (viewed_at AT TIME ZONE 'UTC')::date AS day, COUNT(*)::BIGINT
        FROM profile_views
        WHERE profile_id = $1 AND viewed_at >= $2
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(auth.user_id)
    .bind(since)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to load daily views: {}", e)))?;

    let source_counts: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT source, COUNT(*)::BIGINT
        FROM profile_views
        WHERE profile_id = $1 AND viewed_at >= $2
        GROUP BY source
        ORDER BY COUNT(*) DESC
        "#,
    )
    .bind(auth.user_id)
    .bind(since)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to load view sources: {}", e)))?;

    let total_leads: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM lead_captures WHERE profile_id = $1 AND created_at >= $2",
    )
    .bind(auth.user_id)
    .bind(since)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to count leads: {}", e)))?;

    let daily = fill_daily_series(start, days, &daily_counts);
    let summary = AnalyticsSummary {
        days,
        total_views: daily.iter().map(|d| d.views).sum(),
        total_leads,
        views_by_source: source_counts
            .into_iter()
            .map(|(source, views)| SourceCount {
                source: ViewSource::from_db(&source),
                views,
            })
            .collect(),
        daily,
    };

    let _ = state
        .cache
        .set_with_ttl(&cache_key, &summary, cache_ttl::ANALYTICS)
        .await;

    Ok(Json(DataResponse::new(summary)))
}
