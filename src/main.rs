//! Student-union election backend
//!
//! REST service for voter eligibility, ballot recording and live results, backed by SQLite.

mod api;
mod auth;
mod config;
mod db;
mod eligibility;
mod errors;
mod models;
mod seed;
mod tally;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use eligibility::AllowList;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub allow_list: Arc<AllowList>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting election backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Voter allow-list: {:?}", config.voters_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!(
            "No API PSK configured (ELECTION_API_PSK). President routes are unauthenticated!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    if let Some(path) = &config.elections_path {
        let seeded = seed::seed_elections(&repo, path).await?;
        tracing::info!("Seeded {} election(s) from {:?}", seeded, path);
    }

    let allow_list = Arc::new(AllowList::load(&config.voters_path, &config.id_prefixes)?);
    if allow_list.is_empty() {
        tracing::warn!("Voter allow-list is empty; every vote will be rejected");
    } else {
        tracing::info!("Loaded {} eligible voters", allow_list.len());
    }

    let state = AppState {
        repo,
        allow_list,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let public_routes = Router::new()
        .route("/verify-student", post(api::verify_student))
        .route("/elections/active", get(api::list_active_elections))
        .route("/vote", post(api::cast_votes))
        .route("/vote-status", post(api::vote_status));

    let president_routes = Router::new()
        .route("/elections/live", get(api::live_results))
        .route("/elections/{id}/results", get(api::get_election_results))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/public", public_routes)
        .nest("/api/president", president_routes)
        .merge(health_routes)
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
