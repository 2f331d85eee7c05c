//! Link editor routes
//!
//! Every mutation loads the caller's links into a `LinkEditor`, applies one
//! operation and saves the whole list back (replace-all).

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::editor::{EditorState, LinkEditor};
use crate::domain::links::{
    AddLinkRequest, Link, LinkField, LinkResponse, ReorderLinksRequest, ReplaceLinksRequest,
    UpdateLinkRequest,
};
use crate::error::ApiError;
use crate::middleware::request_id;

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
    /// Links whose URL did not parse; saved anyway
    pub invalid_link_ids: Vec<Uuid>,
    pub state: EditorState,
}

impl From<&LinkEditor> for LinkListResponse {
    fn from(editor: &LinkEditor) -> Self {
        Self {
            links: editor.links().iter().map(LinkResponse::from).collect(),
            invalid_link_ids: editor.invalid_urls(),
            state: editor.state().clone(),
        }
    }
}

async fn load_editor(state: &AppState, profile_id: Uuid) -> Result<LinkEditor, ApiError> {
    LinkEditor::load(state.links.as_ref(), profile_id)
        .await
        .map_err(|e| ApiError::failed("Failed to load links", e))
}

async fn save_editor(
    state: &AppState,
    headers: &HeaderMap,
    mut editor: LinkEditor,
) -> Result<Json<DataResponse<LinkListResponse>>, ApiError> {
    let profile_id = editor.profile_id();

    editor.save(state.links.as_ref()).await.map_err(|e| {
        tracing::error!(
            %profile_id,
            request_id = request_id(headers).unwrap_or("-"),
            error = %e,
            "Link save failed"
        );
        ApiError::from(e)
    })?;

    // Public page embeds the links
    let slug = slug_or_warn(
        profile_id,
        sqlx::query_scalar("SELECT slug FROM profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&state.db)
            .await,
    );
    state.cache.invalidate_profile(profile_id, slug.as_deref()).await;

    Ok(Json(DataResponse::new(LinkListResponse::from(&editor))))
}

/// Slug for cache invalidation; a failed lookup is logged and skips the public page key
fn slug_or_warn(profile_id: Uuid, lookup: Result<Option<String>, sqlx::Error>) -> Option<String> {
    match lookup {
        Ok(slug) => slug,
        Err(e) => {
            tracing::warn!(%profile_id, error = %e, "Slug lookup failed, public page cache left as is");
            None
        }
    }
}

/// GET /profiles/me/links
pub async fn list_links(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let editor = load_editor(&state, auth.user_id).await?;
    Ok(Json(DataResponse::new(LinkListResponse::from(&editor))))
}

/// PUT /profiles/me/links
///
/// Replace the whole list; request order becomes link order.
pub async fn replace_links(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    headers: HeaderMap,
    Json(req): Json<ReplaceLinksRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let links = req
        .links
        .into_iter()
        .map(|input| Link::new(input.link_type, input.label, input.url))
        .collect();

    let editor = LinkEditor::with_links(auth.user_id, links);

    tracing::info!(profile_id = %auth.user_id, count = editor.len(), "Replacing links");
    save_editor(&state, &headers, editor).await
}

/// POST /profiles/me/links
///
/// Append a link, blank website by default.
pub async fn add_link(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    headers: HeaderMap,
    Json(req): Json<AddLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut editor = load_editor(&state, auth.user_id).await?;
    let id = editor.add();

    if let Some(link_type) = req.link_type {
        editor.update(id, LinkField::Type, link_type.as_str())?;
    }
    if let Some(label) = &req.label {
        editor.update(id, LinkField::Label, label)?;
    }
    if let Some(url) = &req.url {
        editor.update(id, LinkField::Url, url)?;
    }

    save_editor(&state, &headers, editor).await
}

/// PATCH /profiles/me/links/:link_id
pub async fn update_link(
    State(state): State<Arc<AppState>>,
    Path(link_id): Path<Uuid>,
    auth: RequireAuth,
    headers: HeaderMap,
    Json(req): Json<UpdateLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut editor = load_editor(&state, auth.user_id).await?;
    editor.update_named(link_id, &req.field, &req.value)?;
    save_editor(&state, &headers, editor).await
}

/// DELETE /profiles/me/links/:link_id
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Path(link_id): Path<Uuid>,
    auth: RequireAuth,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let mut editor = load_editor(&state, auth.user_id).await?;
    editor.remove(link_id)?;
    save_editor(&state, &headers, editor).await
}

/// POST /profiles/me/links/reorder
pub async fn reorder_links(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    headers: HeaderMap,
    Json(req): Json<ReorderLinksRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut editor = load_editor(&state, auth.user_id).await?;
    editor.reorder(req.from_index, req.to_index)?;
    save_editor(&state, &headers, editor).await
}
