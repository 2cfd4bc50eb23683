use std::sync::Arc;
use booking_scraper::config::{ConfigManager, FileConfigManager};

#[tokio::main]
async fn main() -> booking_scraper::error::Result<()> {
    booking_scraper::init_tracing();

    let config_manager = FileConfigManager::from_env();
    let config = Arc::new(config_manager.load_config().await?);

    tracing::info!(
        "Starting scraper server (max {} concurrent browser sessions)",
        config.scraper.max_concurrent_sessions
    );

    if let Err(e) = booking_scraper::api::start_api_server(config).await {
        tracing::error!("Scraper server error: {}", e);
        return Err(e);
    }

    tracing::info!("Scraper server stopped.");
    Ok(())
}
