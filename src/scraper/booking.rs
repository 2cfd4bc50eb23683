use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::browser::render_in_session;
use crate::config::{BrowserConfig, TimingConfig};
use crate::error::Result;
use crate::parser::listing_parser::PROPERTY_CARD_SELECTOR;
use crate::parser::{format_duration, format_person_details, ListingParser, ListingRecord};
use crate::scraper::query::SearchQuery;

/// Loads a results page and hands back its rendered markup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Runs each fetch in its own headless Chromium session.
pub struct ChromiumFetcher {
    browser: BrowserConfig,
    timing: TimingConfig,
}

impl ChromiumFetcher {
    pub fn new(browser: BrowserConfig, timing: TimingConfig) -> Self {
        Self { browser, timing }
    }
}

#[async_trait]
impl PageFetcher for ChromiumFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        render_in_session(&self.browser, url, PROPERTY_CARD_SELECTOR, &self.timing).await
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotelScraper: Send + Sync {
    /// Never fails: a broken session yields an empty list.
    async fn scrape(&self, query: &SearchQuery) -> Vec<ListingRecord>;
}

pub struct BookingScraper<F: PageFetcher> {
    fetcher: F,
    parser: ListingParser,
}

impl<F: PageFetcher> BookingScraper<F> {
    pub fn new(fetcher: F) -> Result<Self> {
        Ok(Self {
            fetcher,
            parser: ListingParser::new()?,
        })
    }

    async fn try_scrape(&self, query: &SearchQuery) -> Result<Vec<ListingRecord>> {
        let url = query.search_url();
        let html = self.fetcher.fetch(&url).await?;

        let cards = self.parser.parse_cards(&html);
        if cards.is_empty() {
            warn!("No hotel cards found. Possible bot detection or empty results.");
            return Ok(Vec::new());
        }

        let duration = format_duration(&query.checkin_date, &query.checkout_date);
        let person_details = format_person_details(query.num_adults, query.num_children, &query.children_ages);

        let hotels: Vec<ListingRecord> = cards
            .into_iter()
            .map(|card| ListingRecord::new(card.name, card.price, duration.clone(), person_details.clone()))
            .collect();

        info!("Scraped {} hotels", hotels.len());
        Ok(hotels)
    }
}

#[async_trait]
impl<F: PageFetcher> HotelScraper for BookingScraper<F> {
    async fn scrape(&self, query: &SearchQuery) -> Vec<ListingRecord> {
        info!(
            "Scraping hotels in {} from {} to {}",
            query.location, query.checkin_date, query.checkout_date
        );

        match self.try_scrape(query).await {
            Ok(hotels) => hotels,
            Err(e) => {
                error!("Error during scraping: {}", e);
                Vec::new()
            }
        }
    }
}
