//! JSON extraction and structural validation of the generated evaluation.
//! Both failure modes are fatal for the pipeline run: malformed JSON is not
//! transient, and a schema-violating response would fail the same way on a
//! retry of the same prompt.

use siteval_common::types::GeneratedEvaluation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema violation: {0}")]
    Schema(String),
}

const TRUST_LEVELS: &[&str] = &["low", "medium", "high"];

/// Strip a wrapping markdown code fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse and validate raw generated text. Serde enforces the shape (every
/// metric object present, fields typed); `validate` enforces the ranges,
/// integrality, and non-emptiness on top.
pub fn parse_evaluation(raw: &str) -> Result<GeneratedEvaluation, ValidationError> {
    let evaluation: GeneratedEvaluation = serde_json::from_str(strip_code_fence(raw))?;
    validate(&evaluation)?;
    Ok(evaluation)
}

fn validate(evaluation: &GeneratedEvaluation) -> Result<(), ValidationError> {
    for (name, metric) in evaluation.metrics() {
        if !(1.0..=10.0).contains(&metric.score) {
            return Err(ValidationError::Schema(format!(
                "{name} score {} is outside 1-10",
                metric.score
            )));
        }
        if metric.score.fract() != 0.0 {
            return Err(ValidationError::Schema(format!(
                "{name} score {} is not an integer",
                metric.score
            )));
        }
        if metric.reason.trim().is_empty() {
            return Err(ValidationError::Schema(format!("{name} reason is empty")));
        }
    }

    if evaluation.summary.trim().is_empty() {
        return Err(ValidationError::Schema("summary is empty".into()));
    }

    if let Some(ref recommendations) = evaluation.recommendations {
        if recommendations.is_empty() {
            return Err(ValidationError::Schema("recommendations list is empty".into()));
        }
        if recommendations.iter().any(|r| r.trim().is_empty()) {
            return Err(ValidationError::Schema(
                "recommendations contain an empty entry".into(),
            ));
        }
    }

    if let Some(ref impressions) = evaluation.first_impressions {
        if let Some(ref trust_level) = impressions.trust_level {
            if !TRUST_LEVELS.contains(&trust_level.as_str()) {
                return Err(ValidationError::Schema(format!(
                    "trustLevel \"{trust_level}\" is not one of low/medium/high"
                )));
            }
        }
    }

    Ok(())
}
