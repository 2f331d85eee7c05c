//! Demo mode routes
//!
//! Served from the in-memory demo context; 404 unless demo mode is enabled.
//!
//! Demo routes carry no authentication. Every visitor shares one demo profile
//! and one link store, so `PUT /demo/links` is limited to `DEMO_ROLE=admin`
//! deployments and answers 403 otherwise.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::domain::demo::DemoContext;
use crate::domain::editor::LinkEditor;
use crate::domain::links::{Link, LinkResponse, ReplaceLinksRequest};
use crate::domain::profiles::{ProfileResponse, PublicProfileResponse};
use crate::error::ApiError;
use crate::routes::links::LinkListResponse;
use crate::store::LinkRepository;

fn demo(state: &AppState) -> Result<&DemoContext, ApiError> {
    state
        .demo
        .as_ref()
        .ok_or_else(|| ApiError::not_found("Demo mode is disabled"))
}

fn ensure_can_edit(demo: &DemoContext) -> Result<(), ApiError> {
    if demo.role.can_edit_links() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Demo links are read-only for this role"))
    }
}

/// GET /demo/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let demo = demo(&state)?;
    Ok(Json(DataResponse::new(demo.session())))
}

/// GET /demo/profile
pub async fn get_profile(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let demo = demo(&state)?;
    let links = demo.links.list_for_profile(demo.profile.id).await?;

    Ok(Json(DataResponse::new(PublicProfileResponse {
        profile: ProfileResponse::from_profile(
            demo.profile.clone(),
            &state.settings.public_profile_base_url,
        ),
        links: links.iter().map(LinkResponse::from).collect(),
    })))
}

/// PUT /demo/links
pub async fn replace_links(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReplaceLinksRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let demo = demo(&state)?;
    ensure_can_edit(demo)?;

    let links = req
        .links
        .into_iter()
        .map(|input| Link::new(input.link_type, input.label, input.url))
        .collect();

    let mut editor = LinkEditor::with_links(demo.profile.id, links);
    editor.save(&demo.links).await?;

    tracing::debug!(count = editor.len(), "Demo links replaced");
    Ok(Json(DataResponse::new(LinkListResponse::from(&editor))))
}

/// GET /demo/analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let demo = demo(&state)?;
    Ok(Json(DataResponse::new(demo.analytics())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::demo::DemoRole;
    use axum::http::StatusCode;

    #[test]
    fn user_demo_cannot_replace_links() {
        let err = ensure_can_edit(&DemoContext::new(DemoRole::User)).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn admin_demo_can_replace_links() {
        assert!(ensure_can_edit(&DemoContext::new(DemoRole::Admin)).is_ok());
    }
}
