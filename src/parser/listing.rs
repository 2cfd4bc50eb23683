use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Placeholder for a card field that could not be found.
pub const NOT_AVAILABLE: &str = "N/A";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One hotel entry pulled from a search results page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub name: String,
    pub price: String,
    pub duration: String,
    pub person_details: String,
}

impl ListingRecord {
    pub fn new(name: Option<String>, price: Option<String>, duration: String, person_details: String) -> Self {
        Self {
            name: name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            price: price.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            duration,
            person_details,
        }
    }
}

// describe the stay length, nights always mirror days
pub fn format_duration(checkin_date: &str, checkout_date: &str) -> String {
    let parsed = NaiveDate::parse_from_str(checkin_date, DATE_FORMAT)
        .and_then(|checkin| NaiveDate::parse_from_str(checkout_date, DATE_FORMAT).map(|checkout| (checkin, checkout)));

    let (checkin, checkout) = match parsed {
        Ok(dates) => dates,
        Err(e) => {
            debug!("Error formatting duration {} to {}: {}", checkin_date, checkout_date, e);
            return "Invalid date format".to_string();
        }
    };

    let total_days = (checkout - checkin).num_days();
    let nights = total_days;
    if total_days == 0 {
        return "Same day stay".to_string();
    }

    let days_text = if total_days == 1 { "day" } else { "days" };
    let nights_text = if nights == 1 { "night" } else { "nights" };
    format!("{} {} {} {}", total_days, days_text, nights, nights_text)
}

// describe the party, children part only when there are any
pub fn format_person_details(num_adults: u32, num_children: u32, children_ages: &[u32]) -> String {
    let mut details = format!("{} adults", num_adults);
    if num_children > 0 {
        let ages = children_ages
            .iter()
            .map(|age| age.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        details.push_str(&format!(", {} children (ages: {})", num_children, ages));
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_day_stay() {
        assert_eq!(format_duration("2025-03-10", "2025-03-10"), "Same day stay");
    }

    #[test]
    fn test_single_night() {
        assert_eq!(format_duration("2025-03-10", "2025-03-11"), "1 day 1 night");
        // across a month boundary
        assert_eq!(format_duration("2025-01-31", "2025-02-01"), "1 day 1 night");
    }

    #[test]
    fn test_multi_night() {
        assert_eq!(format_duration("2025-03-10", "2025-03-14"), "4 days 4 nights");
        assert_eq!(format_duration("2024-02-27", "2024-03-01"), "3 days 3 nights");
    }

    #[test]
    fn test_checkout_before_checkin_is_tolerated() {
        assert_eq!(format_duration("2025-03-14", "2025-03-12"), "-2 days -2 nights");
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(format_duration("not-a-date", "2025-03-11"), "Invalid date format");
        assert_eq!(format_duration("2025-03-10", "2025-02-30"), "Invalid date format");
        assert_eq!(format_duration("", ""), "Invalid date format");
    }

    #[test]
    fn test_person_details_adults_only() {
        assert_eq!(format_person_details(2, 0, &[]), "2 adults");
        // ages are ignored without children
        assert_eq!(format_person_details(1, 0, &[7]), "1 adults");
    }

    #[test]
    fn test_person_details_with_children() {
        assert_eq!(format_person_details(2, 1, &[5]), "2 adults, 1 children (ages: 5)");
        assert_eq!(format_person_details(2, 2, &[5, 9]), "2 adults, 2 children (ages: 5, 9)");
        assert_eq!(format_person_details(1, 2, &[]), "1 adults, 2 children (ages: )");
    }

    #[test]
    fn test_record_fallbacks() {
        let record = ListingRecord::new(None, Some("€ 120".to_string()), "1 day 1 night".to_string(), "2 adults".to_string());
        assert_eq!(record.name, "N/A");
        assert_eq!(record.price, "€ 120");
    }

    #[test]
    fn test_record_json_shape() {
        let record = ListingRecord::new(
            Some("Hotel Test".to_string()),
            None,
            "Same day stay".to_string(),
            "2 adults".to_string(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Hotel Test",
                "price": "N/A",
                "duration": "Same day stay",
                "person_details": "2 adults"
            })
        );
    }
}
