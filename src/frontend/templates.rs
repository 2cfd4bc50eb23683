use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::parser::ListingRecord;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f7fa; color: #1a1a1a; }
header { background: #003580; color: #fff; padding: 1rem 2rem; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
form { display: grid; grid-template-columns: repeat(2, 1fr); gap: 1rem; background: #fff; padding: 1.5rem; border-radius: 8px; }
label { display: flex; flex-direction: column; font-size: 0.9rem; gap: 0.25rem; }
button { grid-column: span 2; padding: 0.75rem; background: #0071c2; color: #fff; border: 0; border-radius: 4px; }
.error { background: #fde8e8; border: 1px solid #e02424; color: #9b1c1c; padding: 1rem; border-radius: 4px; }
.hotel { background: #fff; padding: 1rem 1.5rem; margin-bottom: 1rem; border-radius: 8px; }
.hotel h3 { margin: 0 0 0.5rem; }
"#;

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header { h1 { "Hotel Search" } }
                main { (content) }
            }
        }
    }
}

pub fn index_page() -> Markup {
    layout(
        "Hotel Search",
        html! {
            form method="post" action="/scrape" {
                label { "Location" input type="text" name="location" required; }
                label { "Adults" input type="number" name="num_adults" min="1" value="2" required; }
                label { "Check-in" input type="date" name="checkin_date" required; }
                label { "Check-out" input type="date" name="checkout_date" required; }
                label { "Children" input type="number" name="num_children" min="0" value="0" required; }
                label { "Children ages (comma separated)" input type="text" name="children_ages" placeholder="5, 9"; }
                button type="submit" { "Search hotels" }
            }
        },
    )
}

pub fn results_page(location: &str, hotels: &[ListingRecord], error: Option<&str>) -> Markup {
    layout(
        &format!("Hotels in {}", location),
        html! {
            h2 { "Hotels in " (location) }
            @if let Some(message) = error {
                div class="error" role="alert" { (message) }
            }
            @if hotels.is_empty() && error.is_none() {
                p class="empty" { "No hotels found for this search." }
            }
            @for hotel in hotels {
                div class="hotel" {
                    h3 { (hotel.name) }
                    p { strong { "Price: " } (hotel.price) }
                    p { strong { "Stay: " } (hotel.duration) }
                    p { strong { "Guests: " } (hotel.person_details) }
                }
            }
            p { a href="/" { "New search" } }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(name: &str) -> ListingRecord {
        ListingRecord {
            name: name.to_string(),
            price: "€ 150".to_string(),
            duration: "1 day 1 night".to_string(),
            person_details: "2 adults".to_string(),
        }
    }

    #[test]
    fn test_index_page_has_form_fields() {
        let page = index_page().into_string();
        for field in ["location", "checkin_date", "checkout_date", "num_adults", "num_children", "children_ages"] {
            assert!(page.contains(&format!("name=\"{}\"", field)), "missing field {}", field);
        }
        assert!(page.contains("action=\"/scrape\""));
    }

    #[test]
    fn test_results_page_lists_hotels() {
        let page = results_page("Vienna", &[hotel("Hotel Sacher"), hotel("Pension Nord")], None).into_string();

        assert!(page.contains("Hotels in Vienna"));
        assert!(page.contains("Hotel Sacher"));
        assert!(page.contains("Pension Nord"));
        assert!(page.contains("1 day 1 night"));
        assert!(!page.contains("class=\"error\""));
    }

    #[test]
    fn test_results_page_error_banner() {
        let page = results_page("Vienna", &[], Some("Failed to scrape: boom")).into_string();

        assert!(page.contains("class=\"error\""));
        assert!(page.contains("Failed to scrape: boom"));
        assert!(!page.contains("No hotels found"));
    }

    #[test]
    fn test_results_page_escapes_scraped_text() {
        let page = results_page("<b>Nice</b>", &[hotel("<script>x</script>")], None).into_string();
        assert!(!page.contains("<script>x</script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("&lt;b&gt;Nice"));
    }
}
