pub mod booking;
pub mod query;

pub use booking::{BookingScraper, ChromiumFetcher, HotelScraper, PageFetcher};
pub use query::{ScrapeForm, SearchQuery};
