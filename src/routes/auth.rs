//! Authentication routes
//!
//! These routes proxy authentication requests to Supabase Auth and make sure
//! every account has a profile row with a public slug.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

use crate::api::response::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::auth::{
    validate_password, AuthResponse, OAuthParams, OAuthProvider, OAuthUrlResponse,
    RefreshTokenRequest, SessionResponse, SignInRequest, SignUpRequest, SignupPendingResponse,
    SupabaseAuthResponse, SupabaseErrorResponse, SupabaseSignupResponse, SupabaseUser,
    UpdateUserRequest, User,
};
use crate::domain::profiles::slug_from_email;
use crate::error::ApiError;

const SLUG_ATTEMPTS: usize = 3;

fn parse_user_id(id: &str) -> Result<Uuid, ApiError> {
    id.parse()
        .map_err(|_| ApiError::internal("Invalid user ID from auth service"))
}

fn full_name_from_metadata(metadata: Option<&serde_json::Value>) -> Option<String> {
    metadata
        .and_then(|m| m.get("full_name"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Create the profile row for an auth user if it does not exist yet.
///
/// Slugs carry a random suffix; on the rare collision a fresh one is tried.
async fn ensure_profile(
    db: &PgPool,
    user_id: Uuid,
    email: &str,
    full_name: Option<&str>,
) -> Result<(), ApiError> {
    for attempt in 1..=SLUG_ATTEMPTS {
        let slug = slug_from_email(email);
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (id, slug, email, full_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&slug)
        .bind(email)
        .bind(full_name)
        .execute(db)
        .await;

        match result {
            Ok(done) => {
                if done.rows_affected() > 0 {
                    tracing::info!(%user_id, slug = %slug, "Profile created");
                }
                return Ok(());
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!(%user_id, attempt, "Slug collision, retrying");
            }
            Err(e) => return Err(ApiError::internal(format!("Failed to create profile: {}", e))),
        }
    }

    Err(ApiError::internal("Could not allocate a profile URL"))
}

async fn supabase_error(response: reqwest::Response, fallback: &str) -> SupabaseErrorResponse {
    response
        .json()
        .await
        .unwrap_or_else(|_| SupabaseErrorResponse::with_error(fallback))
}

fn auth_response(resp: SupabaseAuthResponse) -> AuthResponse {
    AuthResponse {
        access_token: resp.access_token,
        refresh_token: resp.refresh_token,
        expires_in: resp.expires_in,
        user: resp.user.into(),
    }
}

/// POST /auth/signup
///
/// Register a new user with Supabase and create a profile.
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> Result<Response, ApiError> {
    validate_password(&req.password).map_err(ApiError::bad_request)?;

    let supabase_req = serde_json::json!({
        "email": req.email,
        "password": req.password,
        "data": {
            "full_name": req.full_name,
        }
    });

    let response = state
        .http_client
        .post(format!("{}/auth/v1/signup", state.settings.supabase_url))
        .header("apikey", &state.settings.supabase_anon_key)
        .json(&supabase_req)
        .send()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to connect to auth service: {}", e)))?;

    if !response.status().is_success() {
        let error = supabase_error(response, "Sign up failed").await;
        return Err(ApiError::bad_request(error.get_message()));
    }

    // Body shape depends on whether email confirmation is enabled
    let response_text = response
        .text()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read auth response: {}", e)))?;

    if let Ok(auth) = serde_json::from_str::<SupabaseAuthResponse>(&response_text) {
        let user_id = parse_user_id(&auth.user.id)?;
        ensure_profile(&state.db, user_id, &req.email, req.full_name.as_deref()).await?;
        return Ok(Created(auth_response(auth)).into_response());
    }

    if let Ok(signup) = serde_json::from_str::<SupabaseSignupResponse>(&response_text) {
        let user_id = parse_user_id(&signup.id)?;
        ensure_profile(&state.db, user_id, &req.email, req.full_name.as_deref()).await?;
        let pending: SignupPendingResponse = signup.into();
        return Ok(Created(pending).into_response());
    }

    Err(ApiError::internal(
        "Failed to parse auth response: unexpected format",
    ))
}

/// POST /auth/signin
///
/// Sign in with email and password.
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .http_client
        .post(format!(
            "{}/auth/v1/token?grant_type=password",
            state.settings.supabase_url
        ))
        .header("apikey", &state.settings.supabase_anon_key)
        .json(&serde_json::json!({
            "email": req.email,
            "password": req.password
        }))
        .send()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to connect to auth service: {}", e)))?;

    if !response.status().is_success() {
        let error = supabase_error(response, "Invalid credentials").await;
        return Err(ApiError::unauthorized(error.get_message()));
    }

    let auth: SupabaseAuthResponse = response
        .json()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to parse auth response: {}", e)))?;

    // Users created directly in Supabase (or via OAuth) may have no profile yet
    let user_id = parse_user_id(&auth.user.id)?;
    let full_name = full_name_from_metadata(auth.user.user_metadata.as_ref());
    ensure_profile(&state.db, user_id, &req.email, full_name.as_deref()).await?;

    Ok(Json(DataResponse::new(auth_response(auth))))
}

/// GET /auth/oauth/:provider?redirect_to=...
///
/// Supabase authorize URL for the given provider; the client redirects to it.
pub async fn oauth_url(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<OAuthProvider>,
    Query(params): Query<OAuthParams>,
) -> Result<impl IntoResponse, ApiError> {
    let base = format!(
        "{}/auth/v1/authorize",
        state.settings.supabase_url.trim_end_matches('/')
    );

    let mut query = vec![("provider", provider.as_str().to_string())];
    if let Some(redirect_to) = params.redirect_to.filter(|r| !r.is_empty()) {
        Url::parse(&redirect_to).map_err(|_| ApiError::bad_request("redirect_to must be an absolute URL"))?;
        query.push(("redirect_to", redirect_to));
    }

    let url = Url::parse_with_params(&base, &query)
        .map_err(|e| ApiError::internal(format!("Invalid auth service URL: {}", e)))?;

    Ok(Json(DataResponse::new(OAuthUrlResponse {
        provider,
        url: url.to_string(),
    })))
}

/// POST /auth/signout
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .http_client
        .post(format!("{}/auth/v1/logout", state.settings.supabase_url))
        .header("apikey", &state.settings.supabase_anon_key)
        .bearer_auth(auth.token())
        .send()
        .await;

    if let Err(e) = result {
        tracing::warn!(user_id = %auth.user_id, error = %e, "Supabase logout failed");
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_user(state: &AppState, token: &str) -> Result<SupabaseUser, ApiError> {
    let response = state
        .http_client
        .get(format!("{}/auth/v1/user", state.settings.supabase_url))
        .header("apikey", &state.settings.supabase_anon_key)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch user: {}", e)))?;

    if !response.status().is_success() {
        return Err(ApiError::unauthorized("Invalid session"));
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to parse user response: {}", e)))
}

/// GET /auth/session
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let user: User = fetch_user(&state, auth.token()).await?.into();

    Ok(Json(DataResponse::new(SessionResponse {
        user,
        access_token: auth.token().to_string(),
        expires_at: auth.claims().exp,
    })))
}

/// PUT /auth/user
///
/// Change the account email and/or password.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::bad_request)?;

    let mut body = serde_json::Map::new();
    if let Some(email) = &req.email {
        body.insert("email".to_string(), serde_json::Value::from(email.trim()));
    }
    if let Some(password) = &req.password {
        body.insert("password".to_string(), serde_json::Value::from(password.as_str()));
    }

    let response = state
        .http_client
        .put(format!("{}/auth/v1/user", state.settings.supabase_url))
        .header("apikey", &state.settings.supabase_anon_key)
        .bearer_auth(auth.token())
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to connect to auth service: {}", e)))?;

    if !response.status().is_success() {
        let error = supabase_error(response, "Account update failed").await;
        return Err(ApiError::bad_request(error.get_message()));
    }

    let user: SupabaseUser = response
        .json()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to parse user response: {}", e)))?;

    // Email change may still be pending confirmation; only mirror what Supabase reports
    if let Some(email) = &user.email {
        let changed: Option<String> = sqlx::query_scalar(
            "UPDATE profiles SET email = $2, updated_at = NOW() WHERE id = $1 AND email <> $2 RETURNING slug",
        )
        .bind(auth.user_id)
        .bind(email)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to update profile email: {}", e)))?;

        if let Some(slug) = changed {
            state.cache.invalidate_profile(auth.user_id, Some(&slug)).await;
        }
    }

    tracing::info!(user_id = %auth.user_id, "Account updated");
    Ok(Json(DataResponse::new(User::from(user))))
}

/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .http_client
        .post(format!(
            "{}/auth/v1/token?grant_type=refresh_token",
            state.settings.supabase_url
        ))
        .header("apikey", &state.settings.supabase_anon_key)
        .json(&serde_json::json!({
            "refresh_token": req.refresh_token
        }))
        .send()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to connect to auth service: {}", e)))?;

    if !response.status().is_success() {
        let error = supabase_error(response, "Invalid refresh token").await;
        return Err(ApiError::unauthorized(error.get_message()));
    }

    let auth: SupabaseAuthResponse = response
        .json()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to parse auth response: {}", e)))?;

    Ok(Json(DataResponse::new(auth_response(auth))))
}
