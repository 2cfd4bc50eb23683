use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::ScrapingError;

pub const BASE_URL: &str = "https://www.booking.com";

const TRACKING_LABEL: &str = "gen173nr-1FCAEoggI46AdIM1gEaGyIAQGYATG4AQfIAQ3YAQHoAQH4AQKIAgGoAgO4AqPUlcMGwAIB0gIkNWZlYWUyZjQtNjU3Yy00Njg4LTk5NmEtMmY2MGIxZDBiNmM12AIF4AIB";
const AFFILIATE_ID: &str = "304142";

/// Form body accepted by `POST /scrape`, every field optional until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeForm {
    pub location: Option<String>,
    pub checkin_date: Option<String>,
    pub checkout_date: Option<String>,
    pub num_adults: Option<String>,
    pub num_children: Option<String>,
    pub children_ages: Option<String>,
}

/// Validated search parameters for one scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: String,
    pub checkin_date: String,
    pub checkout_date: String,
    pub num_adults: u32,
    pub num_children: u32,
    pub children_ages: Vec<u32>,
}

impl SearchQuery {
    pub fn from_form(form: ScrapeForm) -> Result<Self, ScrapingError> {
        let required = |value: Option<String>| value.filter(|v| !v.is_empty());

        let (location, checkin_date, checkout_date) = match (
            required(form.location),
            required(form.checkin_date),
            required(form.checkout_date),
        ) {
            (Some(location), Some(checkin), Some(checkout)) => (location, checkin, checkout),
            _ => return Err(ScrapingError::MissingParameters),
        };

        let num_adults = parse_count("num_adults", form.num_adults.as_deref(), 1)?;
        let num_children = parse_count("num_children", form.num_children.as_deref(), 0)?;
        let children_ages = form
            .children_ages
            .as_deref()
            .map(parse_children_ages)
            .unwrap_or_default();

        Ok(Self {
            location,
            checkin_date,
            checkout_date,
            num_adults,
            num_children,
            children_ages,
        })
    }

    /// Results page URL; parameter order and the trailing `&` match what the site's own search form emits.
    pub fn search_url(&self) -> String {
        let location: String = form_urlencoded::byte_serialize(self.location.as_bytes()).collect();
        let ages = self
            .children_ages
            .iter()
            .map(|age| format!("age={}", age))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{base}/searchresults.html?\
             ss={loc}&\
             ssne={loc}&\
             ssne_untouched={loc}&\
             label={label}&\
             aid={aid}&\
             lang=en-us&\
             sb=1&\
             src_elem=sb&\
             src=index&\
             checkin={checkin}&\
             checkout={checkout}&\
             group_adults={adults}&\
             no_rooms=1&\
             group_children={children}&\
             {ages}",
            base = BASE_URL,
            loc = location,
            label = TRACKING_LABEL,
            aid = AFFILIATE_ID,
            checkin = self.checkin_date,
            checkout = self.checkout_date,
            adults = self.num_adults,
            children = self.num_children,
            ages = ages,
        )
    }
}

fn parse_count(field: &str, value: Option<&str>, default: u32) -> Result<u32, ScrapingError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ScrapingError::InvalidInput(format!("{}={}", field, raw))),
    }
}

// "5, 9,x" -> [5, 9], entries that are not plain digits are dropped
pub fn parse_children_ages(raw: &str) -> Vec<u32> {
    raw.split(',')
        .map(str::trim)
        .filter(|age| !age.is_empty() && age.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|age| age.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(location: &str) -> ScrapeForm {
        ScrapeForm {
            location: Some(location.to_string()),
            checkin_date: Some("2025-06-01".to_string()),
            checkout_date: Some("2025-06-04".to_string()),
            num_adults: Some("2".to_string()),
            num_children: Some("1".to_string()),
            children_ages: Some("7".to_string()),
        }
    }

    #[test]
    fn test_from_form() {
        let query = SearchQuery::from_form(form("Paris")).unwrap();
        assert_eq!(query.location, "Paris");
        assert_eq!(query.num_adults, 2);
        assert_eq!(query.num_children, 1);
        assert_eq!(query.children_ages, vec![7]);
    }

    #[test]
    fn test_defaults_for_party_size() {
        let mut form = form("Paris");
        form.num_adults = None;
        form.num_children = None;
        form.children_ages = None;

        let query = SearchQuery::from_form(form).unwrap();
        assert_eq!(query.num_adults, 1);
        assert_eq!(query.num_children, 0);
        assert!(query.children_ages.is_empty());
    }

    #[test]
    fn test_missing_required_parameters() {
        let mut missing_location = form("Paris");
        missing_location.location = None;
        assert!(matches!(SearchQuery::from_form(missing_location), Err(ScrapingError::MissingParameters)));

        assert!(matches!(SearchQuery::from_form(form("")), Err(ScrapingError::MissingParameters)));

        let mut missing_checkout = form("Paris");
        missing_checkout.checkout_date = Some(String::new());
        assert!(matches!(SearchQuery::from_form(missing_checkout), Err(ScrapingError::MissingParameters)));
    }

    #[test]
    fn test_non_numeric_counts() {
        let mut bad = form("Paris");
        bad.num_adults = Some("two".to_string());
        match SearchQuery::from_form(bad) {
            Err(ScrapingError::InvalidInput(msg)) => assert_eq!(msg, "num_adults=two"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_children_ages() {
        assert_eq!(parse_children_ages("5,9"), vec![5, 9]);
        assert_eq!(parse_children_ages(" 5 , x, ,12,-3,4.5"), vec![5, 12]);
        assert!(parse_children_ages("").is_empty());
    }

    #[test]
    fn test_search_url_matches_site_format() {
        let query = SearchQuery {
            location: "New York".to_string(),
            checkin_date: "2025-06-01".to_string(),
            checkout_date: "2025-06-04".to_string(),
            num_adults: 2,
            num_children: 2,
            children_ages: vec![5, 9],
        };

        let expected = "https://www.booking.com/searchresults.html?ss=New+York&ssne=New+York&ssne_untouched=New+York&\
            label=gen173nr-1FCAEoggI46AdIM1gEaGyIAQGYATG4AQfIAQ3YAQHoAQH4AQKIAgGoAgO4AqPUlcMGwAIB0gIkNWZlYWUyZjQtNjU3Yy00Njg4LTk5NmEtMmY2MGIxZDBiNmM12AIF4AIB&\
            aid=304142&lang=en-us&sb=1&src_elem=sb&src=index&checkin=2025-06-01&checkout=2025-06-04&\
            group_adults=2&no_rooms=1&group_children=2&age=5&age=9";
        assert_eq!(query.search_url(), expected);
    }

    #[test]
    fn test_search_url_without_children_keeps_trailing_separator() {
        let query = SearchQuery::from_form(ScrapeForm {
            children_ages: None,
            num_children: Some("0".to_string()),
            ..form("Lisbon")
        })
        .unwrap();

        assert!(query.search_url().ends_with("group_adults=2&no_rooms=1&group_children=0&"));
    }

    #[test]
    fn test_search_url_encodes_location() {
        let query = SearchQuery::from_form(form("Saint-Malo & Co")).unwrap();
        assert!(query.search_url().contains("ss=Saint-Malo+%26+Co&"));
    }
}
