//! SkillSwap Backend
//!
//! REST backend for a peer skill-exchange application, with SQLite persistence
//! and bearer-token authentication.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod swap;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::TokenKeys;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub auth: Arc<TokenKeys>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting SkillSwap Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if no signing secret is configured
    if config.jwt_secret.is_none() {
        tracing::warn!(
            "No token secret configured (SKILLSWAP_JWT_SECRET). Using an ephemeral secret; tokens will not survive a restart!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path, config.db_max_connections).await?;
    let repo = Arc::new(Repository::new(pool));

    let auth = Arc::new(TokenKeys::from_config(
        config.jwt_secret.as_deref(),
        config.token_ttl_secs,
    ));

    // Create application state
    let state = AppState {
        repo: repo.clone(),
        auth,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repo.close().await;
    tracing::info!("Shut down cleanly");

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes that require an authenticated principal
    let protected_routes = Router::new()
        // Own profile
        .route("/myprofile", get(api::get_my_profile))
        .route("/myprofile", put(api::update_my_profile))
        .route("/profile/{user_id}", get(api::view_profile))
        // Swap requests
        .route("/swap/data/{receiver_id}", get(api::swap_data))
        .route("/swap/send", post(api::send_swap))
        .route("/myswaps", get(api::my_swaps))
        .route("/myswaps/sent", get(api::sent_swaps))
        .route("/myswaps/received", get(api::received_swaps))
        .route("/myswaps/respond", patch(api::respond_swap))
        .route("/myswaps/{id}/accept", put(api::accept_swap))
        .route("/myswaps/{id}/reject", put(api::reject_swap))
        .route("/myswaps/cancel/{id}", delete(api::cancel_swap))
        // Feedback
        .route("/feedback", post(api::submit_feedback))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/signup", post(api::signup))
        .route("/login", post(api::login))
        .route("/skills", get(api::list_skills))
        .route("/home", get(api::home));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests;
