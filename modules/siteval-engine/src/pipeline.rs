//! The evaluation orchestrator: content extraction and performance audit
//! in parallel, prompt assembly, one generation call with bounded retry,
//! validation, and scoring. Failures never escape `evaluate` — they come
//! back as `success: false` with a readable message.

use std::collections::HashMap;

use ai_client::{Claude, CompletionOptions};
use pagespeed_client::PagespeedClient;
use serde::Serialize;
use tracing::{info, warn};

use siteval_common::types::{
    ComputedScores, EvaluationInput, ExtractedContent, FirstImpressions, GeneratedEvaluation,
    PerformanceReport, Project, Scores, TokenUsage,
};
use siteval_common::{scoring, Config, EvalError};

use crate::audit::PerformanceAuditor;
use crate::extract::ContentExtractor;
use crate::fetch::{BrowserlessScraper, ContentFetcher};
use crate::{prompt, validate};

/// Cost per 1K tokens, fixed at the Claude Sonnet pricing tier.
const INPUT_COST_PER_1K: f64 = 0.003;
const OUTPUT_COST_PER_1K: f64 = 0.015;

const MAX_OUTPUT_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.2;
const RETRIES: u32 = 2;

/// Outcome of one pipeline run. On failure, `error` is set and no scores
/// are present; the extracted content and audit report are still included
/// so callers can show what was gathered.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub success: bool,
    pub scores: Option<Scores>,
    /// Metric key -> one-sentence reason, AI-sourced metrics only.
    pub notes: HashMap<String, String>,
    pub computed: Option<ComputedScores>,
    pub summary: Option<String>,
    pub first_impressions: Option<FirstImpressions>,
    pub recommendations: Vec<String>,
    pub performance: PerformanceReport,
    pub performance_summary: String,
    pub content: ExtractedContent,
    pub error: Option<String>,
    pub token_usage: Option<TokenUsage>,
    pub estimated_cost: Option<f64>,
}

impl EvaluationResult {
    fn failure(
        message: String,
        content: ExtractedContent,
        performance: PerformanceReport,
        token_usage: Option<TokenUsage>,
    ) -> Self {
        Self {
            success: false,
            scores: None,
            notes: HashMap::new(),
            computed: None,
            summary: None,
            first_impressions: None,
            recommendations: Vec::new(),
            performance_summary: prompt::performance_summary(&performance),
            performance,
            content,
            error: Some(message),
            estimated_cost: token_usage.as_ref().map(estimated_cost),
            token_usage,
        }
    }
}

pub struct Evaluator {
    extractor: ContentExtractor,
    auditor: PerformanceAuditor,
    claude: Claude,
}

impl Evaluator {
    /// Clients are injected here; the evaluator owns no global state and
    /// separate runs share nothing mutable.
    pub fn new(extractor: ContentExtractor, auditor: PerformanceAuditor, claude: Claude) -> Self {
        Self {
            extractor,
            auditor,
            claude,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let rendered = config
            .browserless_url
            .as_deref()
            .map(|base_url| BrowserlessScraper::new(base_url, config.browserless_token.as_deref()));
        let extractor = ContentExtractor::new(ContentFetcher::new(rendered));
        let auditor = PerformanceAuditor::new(Some(PagespeedClient::new(
            config.pagespeed_api_key.as_deref(),
        )));
        let claude = Claude::new(&config.anthropic_api_key, &config.model);
        Self::new(extractor, auditor, claude)
    }

    /// Run the full pipeline for one project. Reruns with the same input
    /// are independent fresh attempts.
    pub async fn evaluate(&self, project: &Project) -> EvaluationResult {
        let (content, performance) = tokio::join!(
            self.extractor.extract(&project.url),
            self.auditor.audit(&project.url)
        );

        if let Some(ref reason) = content.error {
            warn!(url = %project.url, reason, "Content extraction degraded");
            // Audit degradation is survivable; a page we could not read at
            // all leaves nothing to evaluate.
            if content.is_empty() {
                let err = EvalError::ContentUnavailable(format!("{}: {reason}", project.url));
                return EvaluationResult::failure(err.to_string(), content, performance, None);
            }
        }

        let input = EvaluationInput {
            project: project.clone(),
            performance,
            content,
        };
        let task = prompt::build_task_prompt(&input);
        let options = CompletionOptions {
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            retries: RETRIES,
        };

        let completion = match self.claude.complete(prompt::SYSTEM_PROMPT, &task, &options).await {
            Ok(completion) => completion,
            Err(e) => {
                warn!(url = %project.url, error = %e, "Generation failed");
                let err = EvalError::Generation(e.to_string());
                return EvaluationResult::failure(
                    err.to_string(),
                    input.content,
                    input.performance,
                    None,
                );
            }
        };

        let token_usage = TokenUsage {
            input_tokens: completion.input_tokens,
            output_tokens: completion.output_tokens,
        };

        let evaluation = match validate::parse_evaluation(&completion.content) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!(url = %project.url, error = %e, "Generated response rejected");
                let err = EvalError::InvalidResponse(e.to_string());
                return EvaluationResult::failure(
                    err.to_string(),
                    input.content,
                    input.performance,
                    Some(token_usage),
                );
            }
        };

        let (scores, notes) = map_scores(&evaluation);
        let computed = scoring::compute(&scores);

        info!(
            url = %project.url,
            recommendation = computed.recommendation.as_str(),
            overall = computed.overall_score,
            input_tokens = token_usage.input_tokens,
            output_tokens = token_usage.output_tokens,
            "Evaluation complete"
        );

        EvaluationResult {
            success: true,
            scores: Some(scores),
            notes,
            computed: Some(computed),
            summary: Some(evaluation.summary),
            first_impressions: evaluation.first_impressions,
            recommendations: evaluation.recommendations.unwrap_or_default(),
            performance_summary: prompt::performance_summary(&input.performance),
            performance: input.performance,
            content: input.content,
            error: None,
            estimated_cost: Some(estimated_cost(&token_usage)),
            token_usage: Some(token_usage),
        }
    }
}

/// Map the validated 9-metric response into the flat scoring shape.
/// Personal metrics are human-entered and stay unset here; callers merge
/// them before rescoring.
fn map_scores(evaluation: &GeneratedEvaluation) -> (Scores, HashMap<String, String>) {
    let mut scores = Scores::default();
    let mut notes = HashMap::new();

    for (name, metric) in evaluation.metrics() {
        let slot = match name {
            "usability" => &mut scores.usability,
            "value" => &mut scores.value,
            "features" => &mut scores.features,
            "polish" => &mut scores.polish,
            "competition" => &mut scores.competition,
            "market" => &mut scores.market,
            "monetization" => &mut scores.monetization,
            "growth" => &mut scores.growth,
            "maintenance" => &mut scores.maintenance,
            _ => unreachable!("unknown metric key {name}"),
        };
        *slot = Some(metric.score);
        notes.insert(name.to_string(), metric.reason.clone());
    }

    (scores, notes)
}

pub fn estimated_cost(usage: &TokenUsage) -> f64 {
    (usage.input_tokens as f64 / 1000.0) * INPUT_COST_PER_1K
        + (usage.output_tokens as f64 / 1000.0) * OUTPUT_COST_PER_1K
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteval_common::types::{MetricAssessment, Recommendation};

    fn metric(score: f64) -> MetricAssessment {
        MetricAssessment {
            score,
            reason: format!("scored {score}"),
        }
    }

    fn sample_evaluation() -> GeneratedEvaluation {
        GeneratedEvaluation {
            usability: metric(8.0),
            value: metric(7.0),
            features: metric(7.0),
            polish: metric(6.0),
            competition: metric(5.0),
            market: metric(7.0),
            monetization: metric(7.0),
            growth: metric(7.0),
            maintenance: metric(3.0),
            summary: "Strong".into(),
            first_impressions: None,
            recommendations: None,
        }
    }

    #[test]
    fn test_map_scores_fills_ai_metrics_only() {
        let (scores, notes) = map_scores(&sample_evaluation());
        assert_eq!(scores.usability, Some(8.0));
        assert_eq!(scores.maintenance, Some(3.0));
        assert_eq!(scores.passion, None);
        assert_eq!(scores.learning, None);
        assert_eq!(scores.pride, None);
        assert_eq!(notes.len(), 9);
        assert_eq!(notes["value"], "scored 7");
    }

    #[test]
    fn test_mapped_scores_classify() {
        let (scores, _) = map_scores(&sample_evaluation());
        let computed = scoring::compute(&scores);
        // business = (7 + 7 + 7 + (10 - 3)) / 4 = 7, value = 7 -> invest
        assert_eq!(computed.business_score, Some(7.0));
        assert_eq!(computed.recommendation, Recommendation::Invest);
    }

    #[test]
    fn test_estimated_cost() {
        let usage = TokenUsage {
            input_tokens: 2000,
            output_tokens: 1000,
        };
        let cost = estimated_cost(&usage);
        assert!((cost - (2.0 * 0.003 + 1.0 * 0.015)).abs() < 1e-12);
    }

    #[test]
    fn test_failure_result_shape() {
        let result = EvaluationResult::failure(
            "boom".into(),
            ExtractedContent::failed("fetch failed"),
            PerformanceReport::default(),
            None,
        );
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(result.scores.is_none());
        assert!(result.computed.is_none());
        assert!(result.notes.is_empty());
        assert!(result.token_usage.is_none());
        assert!(result.estimated_cost.is_none());
    }

    #[test]
    fn test_failure_after_generation_keeps_usage() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        let result = EvaluationResult::failure(
            "invalid response".into(),
            ExtractedContent::default(),
            PerformanceReport::default(),
            Some(usage),
        );
        assert_eq!(result.token_usage, Some(usage));
        assert!(result.estimated_cost.is_some());
    }
}
