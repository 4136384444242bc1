use std::env;

use crate::error::EvalError;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Runtime configuration, loaded once and passed explicitly to the
/// evaluator. Optional keys reduce fidelity instead of failing:
/// - no `BROWSERLESS_URL` -> content extraction uses the direct fetch
///   strategy only (no JS rendering);
/// - no `PAGESPEED_API_KEY` -> audits run against the shared
///   unauthenticated quota.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub model: String,
    pub pagespeed_api_key: Option<String>,
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, EvalError> {
        Ok(Self {
            anthropic_api_key: required_env("ANTHROPIC_API_KEY")?,
            model: env::var("SITEVAL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            pagespeed_api_key: optional_env("PAGESPEED_API_KEY"),
            browserless_url: optional_env("BROWSERLESS_URL"),
            browserless_token: optional_env("BROWSERLESS_TOKEN"),
        })
    }
}

fn required_env(key: &str) -> Result<String, EvalError> {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| EvalError::Config(format!("{key} environment variable is required")))
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
