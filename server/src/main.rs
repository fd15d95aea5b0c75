//! Quotebook Server - mock remote for the quote sync client.
//!
//! Holds one shared quote collection and exposes it over HTTP:
//! `GET /quotes` returns it, `PUT /quotes` replaces it.

mod config;
mod error;
mod handlers;
mod routes;
mod store;

use crate::config::Config;
use crate::store::QuoteStore;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<QuoteStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotebook_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Quotebook Server on {}:{}", config.host, config.port);

    let store = match &config.quotes_file {
        Some(path) => QuoteStore::open(path).await?,
        None => {
            tracing::info!("No QUOTES_FILE set, keeping quotes in memory");
            QuoteStore::in_memory()
        }
    };

    let state = AppState {
        store: Arc::new(store),
    };

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
