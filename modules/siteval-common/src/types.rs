use serde::{Deserialize, Serialize};

// =============================================================================
// Extracted content
// =============================================================================

/// Structured signals derived from a page's markup. On any fetch or
/// extraction failure the shape stays at its defaults with `error` set —
/// never partially populated garbage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    pub description: String,
    /// h1–h3 in document order, capped at 20.
    pub headings: Vec<String>,
    /// Main content text, capped at 6000 chars plus a trailing ellipsis.
    pub body_text: String,
    pub has_pricing: bool,
    pub has_login: bool,
    pub has_social_proof: bool,
    pub has_security_badges: bool,
    pub has_video: bool,
    pub has_faq: bool,
    /// Call-to-action labels, deduplicated, capped at 10.
    pub call_to_actions: Vec<String>,
    /// Technology names detected from fixed fingerprints.
    pub technologies: Vec<String>,
    pub error: Option<String>,
}

impl ExtractedContent {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// True when extraction yielded nothing a prompt could work with.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body_text.is_empty()
    }
}

// =============================================================================
// Performance audit
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub category: String,
    pub severity: Severity,
    pub message: String,
    pub recommendation: Option<String>,
}

/// Reduced audit scores, each 0–100. Absence of the underlying audit data
/// leaves a score at None and issues empty — never a silent zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub performance: Option<u8>,
    pub accessibility: Option<u8>,
    pub seo: Option<u8>,
    pub mobile: Option<u8>,
    pub technical: Option<u8>,
    pub security: Option<u8>,
    pub issues: Vec<Issue>,
}

impl PerformanceReport {
    pub fn has_data(&self) -> bool {
        self.performance.is_some()
            || self.accessibility.is_some()
            || self.seo.is_some()
            || self.mobile.is_some()
            || self.technical.is_some()
            || self.security.is_some()
    }
}

// =============================================================================
// Project input
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub url: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_audience: Option<String>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

/// Everything one evaluation run feeds into the prompt. Built once per run
/// and not mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationInput {
    pub project: Project,
    pub performance: PerformanceReport,
    pub content: ExtractedContent,
}

// =============================================================================
// Generated evaluation (validated AI response)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAssessment {
    /// Integer 1–10; range- and integrality-checked by the response
    /// validator.
    pub score: f64,
    /// One-sentence justification.
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstImpressions {
    #[serde(default)]
    pub headline: Option<String>,
    /// One of "low", "medium", "high" when present.
    #[serde(default)]
    pub trust_level: Option<String>,
}

/// The structured response the generation service must produce: a fixed
/// rubric of 9 metrics (5 product, 4 business), each scored with a reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedEvaluation {
    pub usability: MetricAssessment,
    pub value: MetricAssessment,
    pub features: MetricAssessment,
    pub polish: MetricAssessment,
    pub competition: MetricAssessment,
    pub market: MetricAssessment,
    pub monetization: MetricAssessment,
    pub growth: MetricAssessment,
    pub maintenance: MetricAssessment,
    pub summary: String,
    #[serde(default)]
    pub first_impressions: Option<FirstImpressions>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
}

impl GeneratedEvaluation {
    /// Metric fields in rubric order, paired with their keys.
    pub fn metrics(&self) -> [(&'static str, &MetricAssessment); 9] {
        [
            ("usability", &self.usability),
            ("value", &self.value),
            ("features", &self.features),
            ("polish", &self.polish),
            ("competition", &self.competition),
            ("market", &self.market),
            ("monetization", &self.monetization),
            ("growth", &self.growth),
            ("maintenance", &self.maintenance),
        ]
    }
}

// =============================================================================
// Scores and recommendation
// =============================================================================

/// Flat 1–10 metric map consumed by the scoring engine, independent of how
/// the numbers were obtained (AI pipeline or human-entered).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    // Product
    pub usability: Option<f64>,
    pub value: Option<f64>,
    pub features: Option<f64>,
    pub polish: Option<f64>,
    pub competition: Option<f64>,
    // Business
    pub market: Option<f64>,
    pub monetization: Option<f64>,
    pub growth: Option<f64>,
    /// Cost metric: higher means more upkeep. Inverted for the business
    /// composite.
    pub maintenance: Option<f64>,
    // Personal
    pub passion: Option<f64>,
    pub learning: Option<f64>,
    pub pride: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Invest,
    Keep,
    Pivot,
    Pause,
    Drop,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Invest => "invest",
            Recommendation::Keep => "keep",
            Recommendation::Pivot => "pivot",
            Recommendation::Pause => "pause",
            Recommendation::Drop => "drop",
        }
    }
}

/// Derived composite scores. Never stored independently of the Scores that
/// produced them — recompute whenever the inputs change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedScores {
    pub product_score: Option<f64>,
    pub business_score: Option<f64>,
    pub personal_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub recommendation: Recommendation,
}

// =============================================================================
// Telemetry
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}
