use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::RequireAuth;

#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
    pub provider: Option<String>,
    pub issuer: String,
    pub audience: String,
    pub expires_at: i64,
}

/// Get current authenticated user info
pub async fn get_me(auth: RequireAuth) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.user_id,
        email: auth.email.clone(),
        role: auth.role.clone(),
        provider: auth.claims().provider().map(str::to_string),
        issuer: auth.issuer.clone(),
        audience: auth.audience.clone(),
        expires_at: auth.claims().exp,
    })
}
