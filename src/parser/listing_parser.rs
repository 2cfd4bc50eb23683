use crate::error::ScrapingError;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub const PROPERTY_CARD_SELECTOR: &str = "div[data-testid='property-card']";
pub const TITLE_SELECTOR: &str = "div[data-testid='title']";
pub const PRICE_SELECTOR: &str = "span[data-testid='price-and-discounted-price']";

/// Raw fields pulled from one property card, before the query-derived fields are added
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyCard {
    pub name: Option<String>,
    pub price: Option<String>,
}

/// html parser for booking.com search result pages
pub struct ListingParser {
    card_selector: Selector,
    title_selector: Selector,
    price_selector: Selector,
}

impl ListingParser {
    // set up a parser with css selectors ready
    pub fn new() -> Result<Self, ScrapingError> {
        Ok(Self {
            card_selector: Selector::parse(PROPERTY_CARD_SELECTOR)
                .map_err(|e| ScrapingError::ParseError(format!("Invalid property card selector: {}", e)))?,
            title_selector: Selector::parse(TITLE_SELECTOR)
                .map_err(|e| ScrapingError::ParseError(format!("Invalid title selector: {}", e)))?,
            price_selector: Selector::parse(PRICE_SELECTOR)
                .map_err(|e| ScrapingError::ParseError(format!("Invalid price selector: {}", e)))?,
        })
    }

    // pull property cards from a rendered results page
    pub fn parse_cards(&self, html: &str) -> Vec<PropertyCard> {
        let document = Html::parse_document(html);
        let cards: Vec<PropertyCard> = document
            .select(&self.card_selector)
            .map(|card| self.parse_single_card(&card))
            .collect();

        debug!("Parsed {} property cards from HTML", cards.len());
        cards
    }

    // every matched card yields a record, absent fields stay None
    fn parse_single_card(&self, card: &ElementRef) -> PropertyCard {
        PropertyCard {
            name: Self::first_text(card, &self.title_selector),
            price: Self::first_text(card, &self.price_selector),
        }
    }

    fn first_text(card: &ElementRef, selector: &Selector) -> Option<String> {
        card.select(selector)
            .next()
            .map(|elem| elem.text().collect::<String>().trim().to_string())
    }
}
