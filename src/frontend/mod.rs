pub mod client;
pub mod templates;

use axum::{
    extract::State,
    routing::{get, post},
    Form, Router,
};
use maud::Markup;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, ScrapingError};

pub use client::{BackendClient, BackendReply, SearchForm};

pub fn create_frontend_router(client: BackendClient) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/scrape", post(scrape_hotels))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(client)
}

pub async fn start_frontend_server(config: Arc<Config>) -> Result<()> {
    let client = BackendClient::new(&config.frontend.backend_url, config.frontend.request_timeout)?;
    let app = create_frontend_router(client);

    let addr = config.frontend.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ScrapingError::ConfigError(format!("Failed to bind {}: {}", addr, e)))?;
    info!(
        "Starting frontend on {} (backend {})",
        listener.local_addr()?,
        config.frontend.backend_url
    );
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn home() -> Markup {
    templates::index_page()
}

async fn scrape_hotels(State(client): State<BackendClient>, Form(form): Form<SearchForm>) -> Markup {
    info!("Received scrape request for location: {}", form.location);

    match client.scrape(&form).await {
        BackendReply::Hotels(hotels) => templates::results_page(&form.location, &hotels, None),
        BackendReply::Failed(error) => templates::results_page(&form.location, &[], Some(&error)),
    }
}
