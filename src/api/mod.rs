use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, ScrapingError};
use crate::parser::ListingRecord;
use crate::scraper::{BookingScraper, ChromiumFetcher, HotelScraper, ScrapeForm, SearchQuery};

#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub hotels: Vec<ListingRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    scraper: Arc<dyn HotelScraper>,
    sessions: Arc<Semaphore>,
}

impl AppState {
    pub fn new(scraper: Arc<dyn HotelScraper>, max_concurrent_sessions: usize) -> Self {
        Self {
            scraper,
            sessions: Arc::new(Semaphore::new(max_concurrent_sessions)),
        }
    }
}

pub struct ApiError(ScrapingError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/scrape", post(scrape_hotels))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_api_server(config: Arc<Config>) -> Result<()> {
    let fetcher = ChromiumFetcher::new(config.browser.clone(), config.timing.clone());
    let scraper = BookingScraper::new(fetcher)?;
    let state = AppState::new(Arc::new(scraper), config.scraper.max_concurrent_sessions);
    let app = create_router(state);

    let addr = config.scraper.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ScrapingError::ConfigError(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Starting scraper server on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn scrape_hotels(
    State(state): State<AppState>,
    Form(form): Form<ScrapeForm>,
) -> std::result::Result<Json<ScrapeResponse>, ApiError> {
    let query = SearchQuery::from_form(form).map_err(|e| {
        warn!("Rejected scrape request: {}", e);
        ApiError(e)
    })?;

    // one permit per browser session
    let _permit = state
        .sessions
        .acquire()
        .await
        .map_err(|e| ApiError(ScrapingError::BrowserError(format!("Session limiter closed: {}", e))))?;
    debug!("Acquired session permit, {} left", state.sessions.available_permits());

    let hotels = state.scraper.scrape(&query).await;
    Ok(Json(ScrapeResponse { hotels }))
}
