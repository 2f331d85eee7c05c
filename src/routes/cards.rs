//! Card order routes

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::cards::{CardDesign, CardKind, CardResponse, CardStatus, OrderCardRequest};
use crate::error::ApiError;
use crate::routes::profiles::fetch_profile;

/// Database row for card
#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: Uuid,
    profile_id: Uuid,
    kind: String,
    design: String,
    quantity: i32,
    unit_price: Decimal,
    status: String,
    shipping_name: String,
    shipping_address: String,
    created_at: DateTime<Utc>,
}

impl CardRow {
    fn into_response(self, target_url: String) -> CardResponse {
        CardResponse {
            id: self.id,
            profile_id: self.profile_id,
            kind: CardKind::from_db(&self.kind),
            design: CardDesign::from_db(&self.design),
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price: self.unit_price * Decimal::from(self.quantity),
            status: CardStatus::from_db(&self.status),
            shipping_name: self.shipping_name,
            shipping_address: self.shipping_address,
            target_url,
            created_at: self.created_at,
        }
    }
}

const CARD_COLUMNS: &str = "id, profile_id, kind, design, quantity, unit_price, status, \
     shipping_name, shipping_address, created_at";

/// GET /cards
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let profile = fetch_profile(&state.db, auth.user_id).await?;
    let target_url = state.public_url(&profile.slug);

    let rows = sqlx::query_as::<_, CardRow>(&format!(
        "SELECT {} FROM cards WHERE profile_id = $1 ORDER BY created_at DESC",
        CARD_COLUMNS
    ))
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to load cards: {}", e)))?;

    let cards: Vec<CardResponse> = rows
        .into_iter()
        .map(|row| row.into_response(target_url.clone()))
        .collect();

    Ok(Json(DataResponse::new(cards)))
}

/// POST /cards
pub async fn order_card(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(req): Json<OrderCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::bad_request)?;

    let profile = fetch_profile(&state.db, auth.user_id).await?;

    let row = sqlx::query_as::<_, CardRow>(&format!(
        r#"
        INSERT INTO cards (profile_id, kind, design, quantity, unit_price, status,
                           shipping_name, shipping_address)
        VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7)
        RETURNING {}
        "#,
        CARD_COLUMNS
    ))
    .bind(auth.user_id)
    .bind(req.kind.as_str())
    .bind(req.design.as_str())
    .bind(req.quantity)
    .bind(req.kind.unit_price())
    .bind(req.shipping_name.trim())
    .bind(req.shipping_address.trim())
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to place card order: {}", e)))?;

    tracing::info!(
        profile_id = %auth.user_id,
        card_id = %row.id,
        kind = req.kind.as_str(),
        quantity = req.quantity,
        total = %req.total_price(),
        "Card ordered"
    );

    Ok(Created(row.into_response(state.public_url(&profile.slug))))
}

/// POST /cards/:card_id/cancel
pub async fn cancel_card(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<Uuid>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let profile = fetch_profile(&state.db, auth.user_id).await?;

    let current: Option<String> =
        sqlx::query_scalar("SELECT status FROM cards WHERE id = $1 AND profile_id = $2")
            .bind(card_id)
            .bind(auth.user_id)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to load card: {}", e)))?;

    let status = current
        .map(|s| CardStatus::from_db(&s))
        .ok_or_else(|| ApiError::not_found("Card not found"))?;

    if !status.can_cancel() {
        return Err(ApiError::conflict(format!(
            "Card is {} and can no longer be cancelled",
            status.as_str()
        )));
    }

    // Guard on status again in case fulfilment moved it meanwhile
    let row = sqlx::query_as::<_, CardRow>(&format!(
        "UPDATE cards SET status = 'cancelled' WHERE id = $1 AND profile_id = $2 AND status = 'pending' RETURNING {}",
        CARD_COLUMNS
    ))
    .bind(card_id)
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(format!("Failed to cancel card: {}", e)))?
    .ok_or_else(|| ApiError::conflict("Card can no longer be cancelled"))?;

    tracing::info!(profile_id = %auth.user_id, card_id = %card_id, "Card order cancelled");

    Ok(Json(DataResponse::new(
        row.into_response(state.public_url(&profile.slug)),
    )))
}
