use std::collections::HashMap;

use serde::Deserialize;

/// Top-level `runPagespeed` response. Everything we do not reduce is
/// ignored at deserialization time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPagespeedResponse {
    #[serde(default)]
    pub lighthouse_result: Option<LighthouseReport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseReport {
    #[serde(default)]
    pub categories: Categories,
    /// Named sub-audits, keyed by audit id (e.g. "viewport", "is-on-https").
    #[serde(default)]
    pub audits: HashMap<String, AuditOutcome>,
}

/// Category scores come back in 0.0–1.0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub performance: Option<CategoryScore>,
    #[serde(default)]
    pub accessibility: Option<CategoryScore>,
    #[serde(default)]
    pub seo: Option<CategoryScore>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryScore {
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditOutcome {
    /// 0.0–1.0; binary audits report exactly 0 or 1. None for
    /// informational audits.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LighthouseReport {
    pub fn audit_score(&self, id: &str) -> Option<f64> {
        self.audits.get(id).and_then(|audit| audit.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_subset_of_real_response() {
        let raw = r#"{
            "id": "https://example.com/",
            "loadingExperience": {"overall_category": "FAST"},
            "lighthouseResult": {
                "requestedUrl": "https://example.com/",
                "categories": {
                    "performance": {"id": "performance", "score": 0.93},
                    "seo": {"id": "seo", "score": 0.8}
                },
                "audits": {
                    "viewport": {"id": "viewport", "score": 1, "title": "Has a viewport tag"},
                    "is-on-https": {"id": "is-on-https", "score": 0, "title": "Uses HTTPS"}
                }
            }
        }"#;
        let response: RunPagespeedResponse = serde_json::from_str(raw).unwrap();
        let report = response.lighthouse_result.unwrap();
        assert_eq!(report.categories.performance.as_ref().unwrap().score, Some(0.93));
        assert!(report.categories.accessibility.is_none());
        assert_eq!(report.audit_score("viewport"), Some(1.0));
        assert_eq!(report.audit_score("is-on-https"), Some(0.0));
        assert_eq!(report.audit_score("tap-targets"), None);
    }
}
