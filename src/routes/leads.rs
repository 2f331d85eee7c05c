//! Lead routes
//!
//! Leads captured on the caller's public profile.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::pagination::{Paginated, PaginationParams};
use crate::api::response::Download;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::leads::{Lead, LeadResponse};
use crate::error::ApiError;
use crate::export::leads_csv;

/// Database row for lead capture
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LeadRow {
    id: Uuid,
    profile_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    message: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id,
            profile_id: row.profile_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

/// GET /leads
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lead_captures WHERE profile_id = $1")
        .bind(auth.user_id)
        .fetch_one(&state.db)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count leads: {}", e)))?;

    let rows = sqlx::query_as::<_, LeadRow>(
        r#"
        SELECT id, profile_id, name, email, phone, company, message, created_at
        FROM lead_captures
        WHERE profile_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(auth.user_id)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to load leads: {}", e)))?;

    let data: Vec<LeadResponse> = rows.into_iter().map(|r| Lead::from(r).into()).collect();

    Ok(Paginated::new(data, &pagination, total.max(0) as u64))
}

/// GET /leads/export
///
/// All leads as CSV, oldest first.
pub async fn export_leads(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let rows = sqlx::query_as::<_, LeadRow>(
        r#"
        SELECT id, profile_id, name, email, phone, company, message, created_at
        FROM lead_captures
        WHERE profile_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to load leads: {}", e)))?;

    let leads: Vec<Lead> = rows.into_iter().map(Lead::from).collect();
    let body = leads_csv(&leads)?;

    tracing::info!(profile_id = %auth.user_id, count = leads.len(), "Exported leads");

    Ok(Download::new(
        "text/csv; charset=utf-8",
        format!("leads-{}.csv", Utc::now().format("%Y%m%d")),
        body,
    ))
}
