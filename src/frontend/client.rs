use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::api::ScrapeResponse;
use crate::error::{Result, ScrapingError};
use crate::parser::ListingRecord;

/// Search form as submitted by the browser, forwarded to the backend unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchForm {
    pub location: String,
    pub checkin_date: String,
    pub checkout_date: String,
    pub num_adults: u32,
    pub num_children: u32,
    #[serde(default)]
    pub children_ages: String,
}

/// What the results page gets to show for one submission.
#[derive(Debug)]
pub enum BackendReply {
    Hotels(Vec<ListingRecord>),
    Failed(String),
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapingError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn scrape(&self, form: &SearchForm) -> BackendReply {
        let url = format!("{}/scrape", self.base_url);

        let response = match self.client.post(&url).form(form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Backend request to {} failed: {}", url, e);
                return BackendReply::Failed(format!("Failed to scrape: {}", e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Backend error: {} - {}", status, text);
            return BackendReply::Failed(format!("Failed to scrape: {}", text));
        }

        match response.json::<ScrapeResponse>().await {
            Ok(body) => {
                info!("Received {} hotels from backend.", body.hotels.len());
                BackendReply::Hotels(body.hotels)
            }
            Err(e) => {
                warn!("Backend returned an unreadable body: {}", e);
                BackendReply::Failed(format!("Failed to scrape: {}", e))
            }
        }
    }
}
