pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod frontend;
pub mod parser;
pub mod scraper;

pub use error::{Result, ScrapingError};
pub use config::Config;
pub use parser::ListingRecord;
pub use crate::scraper::{BookingScraper, HotelScraper, SearchQuery};

/// Installs the fmt subscriber, honouring `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
