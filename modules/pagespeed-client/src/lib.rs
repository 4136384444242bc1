//! Client for the PageSpeed Insights `runPagespeed` API. One request per
//! strategy (mobile/desktop); the caller reduces the Lighthouse report to
//! whatever scores it needs.

pub mod error;
pub mod types;

pub use error::{PagespeedError, Result};
pub use types::{AuditOutcome, Categories, CategoryScore, LighthouseReport};

use std::time::Duration;

use tracing::debug;

use types::RunPagespeedResponse;

const PAGESPEED_API_URL: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Lighthouse runs server-side and is slow; give it room before giving up.
const AUDIT_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

pub struct PagespeedClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl PagespeedClient {
    /// An API key is optional: keyless calls run against the shared
    /// unauthenticated quota.
    pub fn new(api_key: Option<&str>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(AUDIT_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key: api_key.map(String::from),
            base_url: PAGESPEED_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Run one audit for a URL under the given strategy. The best-practices
    /// category is requested alongside the scored ones so its sub-audits
    /// (HTTPS, vulnerable libraries, console errors) land in the report.
    pub async fn run(&self, url: &str, strategy: Strategy) -> Result<LighthouseReport> {
        debug!(url, strategy = strategy.as_str(), "PageSpeed audit request");

        let mut query: Vec<(&str, &str)> = vec![
            ("url", url),
            ("strategy", strategy.as_str()),
            ("category", "performance"),
            ("category", "accessibility"),
            ("category", "seo"),
            ("category", "best-practices"),
        ];
        if let Some(ref key) = self.api_key {
            query.push(("key", key));
        }

        let resp = self.http.get(&self.base_url).query(&query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PagespeedError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: RunPagespeedResponse = resp.json().await?;
        data.lighthouse_result.ok_or(PagespeedError::MissingReport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::Mobile.as_str(), "mobile");
        assert_eq!(Strategy::Desktop.as_str(), "desktop");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PagespeedClient::new(None).with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
