use std::sync::Arc;
use booking_scraper::config::{ConfigManager, FileConfigManager};

#[tokio::main]
async fn main() -> booking_scraper::error::Result<()> {
    booking_scraper::init_tracing();

    let config_manager = FileConfigManager::from_env();
    let config = Arc::new(config_manager.load_config().await?);

    if let Err(e) = booking_scraper::frontend::start_frontend_server(config).await {
        tracing::error!("Frontend server error: {}", e);
        return Err(e);
    }

    tracing::info!("Frontend stopped.");
    Ok(())
}
