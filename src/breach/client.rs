//! Range-query transport.

use std::future::Future;
use std::time::Duration;

use crate::config::BreachConfig;
use crate::error::BreachError;

/// Fetches the raw `SUFFIX:COUNT` table for a 5-character digest prefix.
pub trait RangeClient: Send + Sync {
    fn fetch_range(&self, prefix: &str) -> impl Future<Output = Result<String, BreachError>> + Send;
}

/// HTTPS client for a Pwned Passwords compatible range API.
#[derive(Debug, Clone)]
pub struct HttpRangeClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRangeClient {
    pub fn new(config: &BreachConfig) -> Result<Self, BreachError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BreachError::Request(e.without_url().to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }
}

impl RangeClient for HttpRangeClient {
    async fn fetch_range(&self, prefix: &str) -> Result<String, BreachError> {
        let url = format!("{}/range/{}", self.base_url, prefix);

        // Padding hides the real table size from observers.
        let response = self
            .client
            .get(&url)
            .header("Add-Padding", "true")
            .send()
            .await
            .map_err(|e| BreachError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BreachError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| BreachError::Request(e.without_url().to_string()))
    }
}
