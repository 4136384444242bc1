use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

// --- PageScraper trait ---

/// Strategy for obtaining page markup.
#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<String>;
    fn name(&self) -> &str;
}

fn check_scheme(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).context("Invalid URL")?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
    }
    Ok(())
}

// --- Direct fetch ---

/// Hard bound on a direct document fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; siteval/0.1)";

/// Plain GET of the document as served. No JS rendering.
pub struct HttpScraper {
    client: reqwest::Client,
}

impl HttpScraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageScraper for HttpScraper {
    async fn scrape(&self, url: &str) -> Result<String> {
        check_scheme(url)?;
        info!(url, scraper = "http", "Fetching URL");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("Direct fetch failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Fetch returned status {status}");
        }

        let html = resp.text().await.context("Failed to read response body")?;
        info!(url, scraper = "http", bytes = html.len(), "Fetched successfully");
        Ok(html)
    }

    fn name(&self) -> &str {
        "http"
    }
}

// --- Browserless rendering ---

/// JS-rendering scrape via a Browserless-compatible service.
pub struct BrowserlessScraper {
    client: browserless_client::BrowserlessClient,
}

impl BrowserlessScraper {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        info!(base_url, "Using BrowserlessScraper");
        Self {
            client: browserless_client::BrowserlessClient::new(base_url, token),
        }
    }
}

#[async_trait]
impl PageScraper for BrowserlessScraper {
    async fn scrape(&self, url: &str) -> Result<String> {
        check_scheme(url)?;
        info!(url, scraper = "browserless", "Scraping URL");

        let html = self
            .client
            .content(url)
            .await
            .context("Browserless content request failed")?;

        info!(
            url,
            scraper = "browserless",
            bytes = html.len(),
            "Scraped successfully"
        );
        Ok(html)
    }

    fn name(&self) -> &str {
        "browserless"
    }
}

// --- Fallback composition ---

/// Rendering-first fetch with a direct-fetch fallback. The rendering
/// strategy is optional; without it every fetch goes direct.
pub struct ContentFetcher {
    rendered: Option<BrowserlessScraper>,
    direct: HttpScraper,
}

impl ContentFetcher {
    pub fn new(rendered: Option<BrowserlessScraper>) -> Self {
        Self {
            rendered,
            direct: HttpScraper::new(),
        }
    }

    /// Try the rendering service when configured; fall back to a direct
    /// fetch on any failure or empty result.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        if let Some(ref scraper) = self.rendered {
            match scraper.scrape(url).await {
                Ok(html) if !html.trim().is_empty() => return Ok(html),
                Ok(_) => {
                    warn!(url, "Rendering service returned empty markup, falling back")
                }
                Err(e) => {
                    warn!(url, error = %e, "Rendering service failed, falling back")
                }
            }
        }
        self.direct.scrape(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_check() {
        assert!(check_scheme("https://example.com").is_ok());
        assert!(check_scheme("http://example.com/page").is_ok());
        assert!(check_scheme("ftp://example.com").is_err());
        assert!(check_scheme("javascript:alert(1)").is_err());
        assert!(check_scheme("not a url").is_err());
    }

    #[tokio::test]
    async fn test_direct_fetch_rejects_bad_scheme_without_network() {
        let scraper = HttpScraper::new();
        let err = scraper.scrape("file:///etc/passwd").await.unwrap_err();
        assert!(err.to_string().contains("http/https"));
    }
}
