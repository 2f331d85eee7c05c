use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use cardlink_backend::{
    app, auth, config, db,
    domain::demo::DemoContext,
    logging,
    services::RedisCache,
    store::{LinkRepository, PgLinkRepository},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        demo_mode = settings.demo_mode,
        "Starting cardlink backend"
    );

    let pool = db::create_pool(&settings).await?;
    db::run_migrations(&pool).await?;

    let cache = RedisCache::new(&settings.redis_url, settings.redis_cache_ttl_seconds).await?;

    // One client for Supabase auth calls and JWKS fetches
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?;

    let jwks_cache = auth::JwksCache::new(
        http_client.clone(),
        settings.supabase_jwt_jwks_url.clone(),
        settings.supabase_jwt_issuer.clone(),
        settings.supabase_jwt_audience.clone(),
        settings.jwks_cache_ttl_seconds,
    );

    if let Err(e) = jwks_cache.warm_cache().await {
        tracing::warn!(error = %e, "Failed to warm JWKS cache - will fetch on first request");
    }

    let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));

    let demo = settings
        .demo_mode
        .then(|| DemoContext::new(settings.demo_role));

    let state = app::AppState::new(
        pool,
        settings.clone(),
        jwks_cache,
        cache,
        links,
        http_client,
        demo,
    );

    let router = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
