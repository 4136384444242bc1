//! Deterministic prompt assembly. No network, no clock, no randomness:
//! identical input produces byte-identical output.

use std::fmt::Write;

use siteval_common::types::{EvaluationInput, PerformanceReport};

pub const SYSTEM_PROMPT: &str = r#"You are a seasoned product strategist who evaluates web products for indie builders deciding where to spend their time.

You score strictly against the rubric you are given, you never invent facts that are not in the provided material, and you answer with JSON only — no prose before or after."#;

const RUBRIC: &str = r#"## Scoring rubric

Score each metric as an integer from 1 to 10 and justify it in exactly one sentence.

Bands: 1-3 fundamentally weak, 4-5 below par, 6-7 solid, 8-10 exceptional.

Product metrics:
- usability: how easily a first-time visitor can understand and use the product
- value: strength and clarity of the value proposition
- features: depth and completeness of the feature set
- polish: visual and interaction quality, attention to detail
- competition: differentiation against obvious alternatives (10 = clearly differentiated)

Business metrics:
- market: size and reachability of the addressable market
- monetization: evidence of a working way to charge money
- growth: plausible channels for user growth
- maintenance: ongoing upkeep cost (10 = very costly to keep running, 1 = nearly free)"#;

const OUTPUT_SHAPE: &str = r#"## Output format

Respond with exactly this JSON shape:

{
  "usability": {"score": 7, "reason": "..."},
  "value": {"score": 6, "reason": "..."},
  "features": {"score": 6, "reason": "..."},
  "polish": {"score": 5, "reason": "..."},
  "competition": {"score": 4, "reason": "..."},
  "market": {"score": 6, "reason": "..."},
  "monetization": {"score": 5, "reason": "..."},
  "growth": {"score": 5, "reason": "..."},
  "maintenance": {"score": 3, "reason": "..."},
  "summary": "Two or three sentences on the overall state of the product.",
  "firstImpressions": {"headline": "One-line gut reaction", "trustLevel": "low|medium|high"},
  "recommendations": ["Concrete improvement", "Another concrete improvement"]
}"#;

/// Render the evaluation task for one input. Every populated field lands in
/// a fixed section layout; absent optional fields are omitted entirely.
pub fn build_task_prompt(input: &EvaluationInput) -> String {
    let mut prompt = String::with_capacity(4096);
    let project = &input.project;

    prompt.push_str("## Project\n\n");
    let _ = writeln!(prompt, "Name: {}", project.name);
    let _ = writeln!(prompt, "URL: {}", project.url);
    if let Some(ref description) = project.description {
        let _ = writeln!(prompt, "Description: {description}");
    }
    if let Some(ref category) = project.category {
        let _ = writeln!(prompt, "Category: {category}");
    }
    if let Some(ref audience) = project.target_audience {
        let _ = writeln!(prompt, "Target audience: {audience}");
    }

    if !project.competitors.is_empty() {
        prompt.push_str("\n## Competitors\n\n");
        for competitor in &project.competitors {
            let _ = write!(prompt, "- {} ({})", competitor.name, competitor.url);
            if let Some(ref notes) = competitor.notes {
                let _ = write!(prompt, " — {notes}");
            }
            prompt.push('\n');
        }
    }

    prompt.push_str("\n## Extracted site content\n\n");
    let content = &input.content;
    if let Some(ref error) = content.error {
        let _ = writeln!(prompt, "Content extraction failed: {error}");
    }
    if !content.title.is_empty() {
        let _ = writeln!(prompt, "Title: {}", content.title);
    }
    if !content.description.is_empty() {
        let _ = writeln!(prompt, "Meta description: {}", content.description);
    }
    if !content.headings.is_empty() {
        let _ = writeln!(prompt, "Headings: {}", content.headings.join(" | "));
    }
    if !content.call_to_actions.is_empty() {
        let _ = writeln!(
            prompt,
            "Calls to action: {}",
            content.call_to_actions.join(" | ")
        );
    }
    if !content.technologies.is_empty() {
        let _ = writeln!(prompt, "Detected technologies: {}", content.technologies.join(", "));
    }
    let _ = writeln!(
        prompt,
        "Signals: pricing={} login={} social_proof={} security_badges={} video={} faq={}",
        content.has_pricing,
        content.has_login,
        content.has_social_proof,
        content.has_security_badges,
        content.has_video,
        content.has_faq
    );
    if !content.body_text.is_empty() {
        let _ = writeln!(prompt, "\nPage text:\n{}", content.body_text);
    }

    prompt.push_str("\n## Performance audit\n\n");
    prompt.push_str(&performance_summary(&input.performance));
    prompt.push('\n');

    prompt.push('\n');
    prompt.push_str(RUBRIC);
    prompt.push_str("\n\n");
    prompt.push_str(OUTPUT_SHAPE);
    prompt
}

/// Human-readable reduction of a performance report: one line per known
/// score, then the issue list.
pub fn performance_summary(report: &PerformanceReport) -> String {
    if !report.has_data() {
        return "No performance audit data available.".to_string();
    }

    let mut summary = String::new();
    let scores = [
        ("performance", report.performance),
        ("accessibility", report.accessibility),
        ("seo", report.seo),
        ("mobile", report.mobile),
        ("technical", report.technical),
        ("security", report.security),
    ];
    for (label, score) in scores {
        if let Some(score) = score {
            let _ = writeln!(summary, "{label}: {score}/100");
        }
    }

    if !report.issues.is_empty() {
        summary.push_str("Issues:\n");
        for issue in &report.issues {
            let _ = write!(
                summary,
                "- [{}] {}: {}",
                issue.severity.as_str(),
                issue.category,
                issue.message
            );
            if let Some(ref recommendation) = issue.recommendation {
                let _ = write!(summary, " ({recommendation})");
            }
            summary.push('\n');
        }
    }

    summary.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteval_common::types::{
        Competitor, ExtractedContent, Issue, Project, Severity,
    };

    fn sample_input() -> EvaluationInput {
        EvaluationInput {
            project: Project {
                name: "Acme Notes".into(),
                url: "https://acmenotes.app".into(),
                description: Some("Team note-taking".into()),
                category: None,
                target_audience: Some("small teams".into()),
                competitors: vec![Competitor {
                    name: "Notion".into(),
                    url: "https://notion.so".into(),
                    notes: Some("much bigger".into()),
                }],
            },
            performance: PerformanceReport {
                performance: Some(81),
                mobile: Some(74),
                issues: vec![Issue {
                    category: "seo".into(),
                    severity: Severity::Medium,
                    message: "Missing meta description".into(),
                    recommendation: None,
                }],
                ..Default::default()
            },
            content: ExtractedContent {
                title: "Acme Notes".into(),
                headings: vec!["Organize everything".into()],
                body_text: "Notes for teams.".into(),
                has_pricing: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let input = sample_input();
        assert_eq!(build_task_prompt(&input), build_task_prompt(&input));
    }

    #[test]
    fn test_prompt_renders_populated_fields_and_skips_absent_ones() {
        let prompt = build_task_prompt(&sample_input());
        assert!(prompt.contains("Name: Acme Notes"));
        assert!(prompt.contains("Target audience: small teams"));
        assert!(!prompt.contains("Category:"));
        assert!(prompt.contains("- Notion (https://notion.so) — much bigger"));
        assert!(prompt.contains("Headings: Organize everything"));
        assert!(prompt.contains("pricing=true"));
        assert!(prompt.contains("performance: 81/100"));
        assert!(prompt.contains("[medium] seo: Missing meta description"));
    }

    #[test]
    fn test_prompt_contains_rubric_and_output_shape() {
        let prompt = build_task_prompt(&sample_input());
        assert!(prompt.contains("## Scoring rubric"));
        assert!(prompt.contains("\"maintenance\": {\"score\": 3"));
        assert!(prompt.contains("trustLevel"));
    }

    #[test]
    fn test_summary_without_data() {
        assert_eq!(
            performance_summary(&PerformanceReport::default()),
            "No performance audit data available."
        );
    }

    #[test]
    fn test_summary_lists_only_present_scores() {
        let report = PerformanceReport {
            seo: Some(70),
            ..Default::default()
        };
        let summary = performance_summary(&report);
        assert!(summary.contains("seo: 70/100"));
        assert!(!summary.contains("accessibility"));
    }
}
