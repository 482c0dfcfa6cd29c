//! Gift Registry Backend
//!
//! A REST backend for a shared gift registry: guests browse the catalog and
//! claim gifts, the administrator maintains it. SQLite is the authoritative
//! store; the claim operation is a store-side guarded update so concurrent
//! guests can never double-purchase the same gift.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gift Registry Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if access codes are not configured
    if config.guest_code.is_none() && config.admin_code.is_none() {
        tracing::warn!("No access codes configured (GIFTS_GUEST_CODE / GIFTS_ADMIN_CODE). Authentication is disabled!");
    } else if config.admin_code.is_none() {
        tracing::warn!("No admin code configured (GIFTS_ADMIN_CODE). Admin routes are unprotected!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;

    // Seed the starter catalog on first run
    let seeded = db::seed_if_empty(&pool).await?;
    if seeded > 0 {
        tracing::info!("Seeded initial catalog with {} gifts", seeded);
    }

    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone codes for the auth layers
    let guest_code = state.config.guest_code.clone();
    let admin_code = state.config.admin_code.clone();
    let admin_code_for_guest_tier = admin_code.clone();

    // Admin tier: catalog maintenance. Only the admin code is accepted.
    let admin_routes = Router::new()
        .route("/gifts", post(api::create_gift))
        .route("/gifts/{id}", put(api::update_gift))
        .route("/gifts/{id}", delete(api::delete_gift))
        .route("/gifts/{id}/reset", post(api::reset_gift))
        .route("/export", get(api::export_catalog))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(admin_code.clone(), req, next)
        }));

    // Guest tier: browsing and claiming. Either code is accepted. The layer
    // is applied before the admin router is nested, so it only guards the
    // guest routes.
    let api_routes = Router::new()
        .route("/catalog", get(api::get_catalog))
        .route("/catalog/revision", get(api::get_revision))
        .route("/gifts", get(api::list_gifts))
        .route("/gifts/{id}", get(api::get_gift))
        .route("/gifts/{id}/claim", post(api::claim_gift))
        .layer(middleware::from_fn(move |req, next| {
            auth::guest_auth_layer(
                guest_code.clone(),
                admin_code_for_guest_tier.clone(),
                req,
                next,
            )
        }))
        .nest("/admin", admin_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
