pub mod analytics;
pub mod auth;
pub mod cards;
pub mod demo;
pub mod health;
pub mod leads;
pub mod links;
pub mod me;
pub mod organizations;
pub mod profiles;
pub mod public;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Auth proxy
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/session", get(auth::get_session))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/user", put(auth::update_user))
        .route("/auth/oauth/:provider", get(auth::oauth_url))
        // Protected routes
        .route("/me", get(me::get_me))
        // Own profile and link editor
        .route(
            "/profiles/me",
            get(profiles::get_my_profile).put(profiles::update_my_profile),
        )
        .route(
            "/profiles/me/links",
            get(links::list_links)
                .put(links::replace_links)
                .post(links::add_link),
        )
        .route("/profiles/me/links/reorder", post(links::reorder_links))
        .route(
            "/profiles/me/links/:link_id",
            patch(links::update_link).delete(links::delete_link),
        )
        // Public card
        .route("/p/:slug", get(public::get_public_profile))
        .route("/p/:slug/vcard", get(public::download_vcard))
        .route("/p/:slug/booking.ics", get(public::download_booking))
        .route("/p/:slug/views", post(public::record_view))
        .route("/p/:slug/leads", post(public::capture_lead))
        // Cards
        .route("/cards", get(cards::list_cards).post(cards::order_card))
        .route("/cards/:card_id/cancel", post(cards::cancel_card))
        // Analytics and leads
        .route("/analytics/summary", get(analytics::get_summary))
        .route("/leads", get(leads::list_leads))
        .route("/leads/export", get(leads::export_leads))
        // Organizations
        .route("/companies/:slug", get(organizations::get_company_page))
        .route(
            "/organization/members",
            get(organizations::list_members).post(organizations::add_member),
        )
        .route(
            "/organization/members/:profile_id",
            delete(organizations::remove_member),
        )
        // Demo mode
        .route("/demo/session", get(demo::get_session))
        .route("/demo/profile", get(demo::get_profile))
        .route("/demo/links", put(demo::replace_links))
        .route("/demo/analytics", get(demo::get_analytics))
}
