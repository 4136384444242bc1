//! Client for a Browserless-compatible page rendering service. Used as the
//! JS-rendering scrape strategy; callers fall back to a direct fetch when
//! the service is not configured or fails.

pub mod error;

pub use error::{BrowserlessError, Result};

use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Rendering heavy pages can take a while; bound it hard.
const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ContentRequest<'a> {
    url: &'a str,
}

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(RENDER_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    fn endpoint(&self) -> String {
        match self.token {
            Some(ref token) => format!("{}/content?token={token}", self.base_url),
            None => format!("{}/content", self.base_url),
        }
    }

    /// Fetch fully-rendered HTML content for a URL via the /content endpoint.
    pub async fn content(&self, url: &str) -> Result<String> {
        debug!(url, "Rendering page");

        let resp = self
            .client
            .post(self.endpoint())
            .json(&ContentRequest { url })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}
