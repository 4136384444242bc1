use pagespeed_client::{LighthouseReport, PagespeedClient, Strategy};
use siteval_common::types::{Issue, PerformanceReport, Severity};
use tracing::{info, warn};

/// Named Lighthouse audits reduced to issues when they score under the
/// pass threshold: (audit id, threshold, severity, category).
const ISSUE_CHECKS: &[(&str, f64, Severity, &str)] = &[
    ("viewport", 1.0, Severity::High, "mobile"),
    ("tap-targets", 0.9, Severity::Medium, "mobile"),
    ("color-contrast", 0.9, Severity::Medium, "accessibility"),
    ("is-on-https", 1.0, Severity::High, "security"),
    ("document-title", 1.0, Severity::High, "seo"),
    ("meta-description", 1.0, Severity::Medium, "seo"),
    ("errors-in-console", 1.0, Severity::Low, "technical"),
];

/// Boolean sub-checks averaged into the composites. A missing audit counts
/// as passing: absence of data is no evidence of a problem.
const TECHNICAL_CHECKS: &[&str] = &["doctype", "charset", "errors-in-console", "deprecations"];
const SECURITY_CHECKS: &[&str] = &["is-on-https", "csp-xss", "no-vulnerable-libraries"];

/// Runs mobile and desktop audits and reduces them to a small score set.
/// Every failure path degrades to None/empty; this component never raises.
pub struct PerformanceAuditor {
    client: Option<PagespeedClient>,
}

impl PerformanceAuditor {
    pub fn new(client: Option<PagespeedClient>) -> Self {
        Self { client }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub async fn audit(&self, url: &str) -> PerformanceReport {
        let Some(ref client) = self.client else {
            info!(url, "Performance audit skipped: no audit client configured");
            return PerformanceReport::default();
        };

        // Independent requests; one failing never aborts its sibling.
        let (mobile, desktop) = tokio::join!(
            client.run(url, Strategy::Mobile),
            client.run(url, Strategy::Desktop)
        );
        let mobile = unwrap_report(url, Strategy::Mobile, mobile);
        let desktop = unwrap_report(url, Strategy::Desktop, desktop);

        let report = reduce(mobile.as_ref(), desktop.as_ref());
        info!(
            url,
            performance = report.performance,
            mobile = report.mobile,
            issues = report.issues.len(),
            "Performance audit complete"
        );
        report
    }
}

fn unwrap_report(
    url: &str,
    strategy: Strategy,
    result: pagespeed_client::Result<LighthouseReport>,
) -> Option<LighthouseReport> {
    match result {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(url, strategy = strategy.as_str(), error = %e, "Audit request failed");
            None
        }
    }
}

fn reduce(mobile: Option<&LighthouseReport>, desktop: Option<&LighthouseReport>) -> PerformanceReport {
    // No audit data at all: all scores stay null, never a partial zero.
    let Some(primary) = mobile.or(desktop) else {
        return PerformanceReport::default();
    };

    let mobile_perf = mobile.and_then(|r| category_score(r.categories.performance.as_ref()));
    let desktop_perf = desktop.and_then(|r| category_score(r.categories.performance.as_ref()));

    PerformanceReport {
        performance: mobile_perf.or(desktop_perf),
        accessibility: category_score(primary.categories.accessibility.as_ref()),
        seo: category_score(primary.categories.seo.as_ref()),
        mobile: mobile_composite(mobile_perf, desktop_perf),
        technical: Some(check_average(primary, TECHNICAL_CHECKS)),
        security: Some(check_average(primary, SECURITY_CHECKS)),
        issues: derive_issues(primary),
    }
}

fn category_score(category: Option<&pagespeed_client::CategoryScore>) -> Option<u8> {
    let score = category?.score?;
    Some((score * 100.0).round() as u8)
}

/// 80% weight on the mobile/desktop performance average, 20% on mobile
/// alone. None when the mobile performance score itself is unavailable.
fn mobile_composite(mobile_perf: Option<u8>, desktop_perf: Option<u8>) -> Option<u8> {
    let m = mobile_perf? as f64;
    let avg = match desktop_perf {
        Some(d) => (m + d as f64) / 2.0,
        None => m,
    };
    Some((0.8 * avg + 0.2 * m).round() as u8)
}

/// Mean over a fixed list of binary audits: pass = 100, fail = 0,
/// missing = 100.
fn check_average(report: &LighthouseReport, checks: &[&str]) -> u8 {
    let total: u32 = checks
        .iter()
        .map(|id| match report.audit_score(id) {
            Some(score) if score < 1.0 => 0u32,
            _ => 100,
        })
        .sum();
    (total as f64 / checks.len() as f64).round() as u8
}

fn derive_issues(report: &LighthouseReport) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (id, threshold, severity, category) in ISSUE_CHECKS {
        let Some(audit) = report.audits.get(*id) else {
            continue;
        };
        let Some(score) = audit.score else {
            continue;
        };
        if score < *threshold {
            issues.push(Issue {
                category: category.to_string(),
                severity: *severity,
                message: audit
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Failed audit: {id}")),
                recommendation: audit.description.clone(),
            });
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(value: serde_json::Value) -> LighthouseReport {
        serde_json::from_value(value).unwrap()
    }

    fn full_mobile() -> LighthouseReport {
        report(json!({
            "categories": {
                "performance": {"score": 0.80},
                "accessibility": {"score": 0.95},
                "seo": {"score": 0.77}
            },
            "audits": {
                "viewport": {"score": 0, "title": "No viewport tag", "description": "Add a viewport meta tag."},
                "is-on-https": {"score": 1},
                "doctype": {"score": 1},
                "charset": {"score": 0},
                "color-contrast": {"score": 0.85, "title": "Low contrast text"}
            }
        }))
    }

    fn full_desktop() -> LighthouseReport {
        report(json!({
            "categories": {"performance": {"score": 0.60}},
            "audits": {}
        }))
    }

    #[test]
    fn test_reduce_with_both_strategies() {
        let out = reduce(Some(&full_mobile()), Some(&full_desktop()));
        assert_eq!(out.performance, Some(80));
        assert_eq!(out.accessibility, Some(95));
        assert_eq!(out.seo, Some(77));
        // 0.8 * avg(80, 60) + 0.2 * 80 = 72
        assert_eq!(out.mobile, Some(72));
    }

    #[test]
    fn test_mobile_composite_without_desktop() {
        assert_eq!(mobile_composite(Some(80), None), Some(80));
        assert_eq!(mobile_composite(None, Some(90)), None);
    }

    #[test]
    fn test_reduce_with_no_reports_is_all_null() {
        let out = reduce(None, None);
        assert_eq!(out, PerformanceReport::default());
        assert!(!out.has_data());
    }

    #[test]
    fn test_desktop_only_still_reduces() {
        let out = reduce(None, Some(&full_mobile()));
        assert_eq!(out.performance, Some(80));
        // mobile composite needs a mobile report
        assert_eq!(out.mobile, None);
    }

    #[test]
    fn test_technical_composite_missing_counts_as_pass() {
        // doctype 1, charset 0, errors-in-console missing, deprecations missing
        // -> (100 + 0 + 100 + 100) / 4 = 75
        assert_eq!(check_average(&full_mobile(), TECHNICAL_CHECKS), 75);
    }

    #[test]
    fn test_security_composite_all_passing() {
        assert_eq!(check_average(&full_mobile(), SECURITY_CHECKS), 100);
    }

    #[test]
    fn test_issue_derivation() {
        let issues = derive_issues(&full_mobile());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, "No viewport tag");
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].category, "mobile");
        assert_eq!(
            issues[0].recommendation.as_deref(),
            Some("Add a viewport meta tag.")
        );
        assert_eq!(issues[1].message, "Low contrast text");
        assert_eq!(issues[1].severity, Severity::Medium);
    }

    #[tokio::test]
    async fn test_disabled_auditor_returns_default() {
        let auditor = PerformanceAuditor::disabled();
        let out = auditor.audit("https://example.com").await;
        assert_eq!(out, PerformanceReport::default());
    }
}
