//! InvestHub REST backend — entry point.
//!
//! Serves the investment platform API: ROI simulation, plan-gated project
//! search, investment orders, and the subscription catalog/checkout, backed
//! by SQLite.

mod auth;
mod checkout;
mod config;
mod db;
mod errors;
mod plans;
mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use reqwest::Client;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use checkout::CheckoutClient;
use config::Config;

/// Shared state handed to every handler.
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub checkout: CheckoutClient,
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/simulation", post(routes::simulate))
        .route("/api/projects/search", post(routes::search_projects))
        .route("/api/projects/categories", get(routes::get_categories))
        .route("/api/projects/:id", get(routes::get_project))
        .route("/api/projects", post(routes::create_project))
        .route(
            "/api/investments",
            post(routes::create_investment).get(routes::my_investments),
        )
        .route("/api/subscription/plans", get(routes::get_plans))
        .route("/api/subscription/checkout", post(routes::checkout_session))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    // Load config from environment.
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config.database_url).await?;

    // HTTP client for the outbound checkout-provider calls.
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let checkout = CheckoutClient::new(&config, client);

    let addr = format!("0.0.0.0:{}", config.api_port);
    let state = Arc::new(AppState {
        pool,
        config,
        checkout,
    });

    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
