//! The scoring engine: pure functions from a flat 1–10 metric map to
//! composite scores and a recommendation. Free of side effects and safe to
//! call from any number of concurrent evaluations.

use crate::types::{ComputedScores, Recommendation, Scores};

/// Category weights for the overall score. Renormalized to sum to 1 over
/// whichever categories are present.
const PRODUCT_WEIGHT: f64 = 0.5;
const BUSINESS_WEIGHT: f64 = 0.3;
const PERSONAL_WEIGHT: f64 = 0.2;

/// Pivot applies when the product holds up but perceived value sits at or
/// below this bound (inclusive).
const PIVOT_VALUE_MAX: f64 = 5.0;

/// Mean of the present entries; None when nothing is present.
pub fn average(values: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0u32;
    for value in values.iter().flatten() {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Unweighted mean of the five product metrics.
pub fn product_score(scores: &Scores) -> Option<f64> {
    average(&[
        scores.usability,
        scores.value,
        scores.features,
        scores.polish,
        scores.competition,
    ])
    .map(round2)
}

/// Mean of market, monetization, growth, and inverted maintenance.
/// Maintenance is a cost metric: `10 - m` makes low upkeep contribute
/// positively.
pub fn business_score(scores: &Scores) -> Option<f64> {
    average(&[
        scores.market,
        scores.monetization,
        scores.growth,
        scores.maintenance.map(|m| 10.0 - m),
    ])
    .map(round2)
}

pub fn personal_score(scores: &Scores) -> Option<f64> {
    average(&[scores.passion, scores.learning, scores.pride]).map(round2)
}

/// Weighted blend of the composites that exist, with weights renormalized
/// over the present categories. None only when all three are absent.
pub fn overall_score(
    product: Option<f64>,
    business: Option<f64>,
    personal: Option<f64>,
) -> Option<f64> {
    let parts = [
        (product, PRODUCT_WEIGHT),
        (business, BUSINESS_WEIGHT),
        (personal, PERSONAL_WEIGHT),
    ];

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (score, weight) in parts {
        if let Some(score) = score {
            weighted += score * weight;
            total_weight += weight;
        }
    }

    if total_weight == 0.0 {
        None
    } else {
        Some(round2(weighted / total_weight))
    }
}

/// Precedence-ordered classifier, first match wins. `value` defaults to 0
/// and `maintenance` to 5 when absent; absent composites compare as 0, so
/// they can never satisfy a `>=` rule.
pub fn recommend(scores: &Scores, product: Option<f64>, business: Option<f64>) -> Recommendation {
    let value = scores.value.unwrap_or(0.0);
    let maintenance = scores.maintenance.unwrap_or(5.0);
    let product = product.unwrap_or(0.0);
    let business = business.unwrap_or(0.0);

    if value >= 7.0 && business >= 7.0 {
        return Recommendation::Invest;
    }
    if value <= 4.0 || (maintenance >= 7.0 && product < 6.0) {
        return Recommendation::Drop;
    }
    if value >= 5.0 && maintenance <= 4.0 {
        return Recommendation::Keep;
    }
    if product >= 6.0 && value <= PIVOT_VALUE_MAX {
        return Recommendation::Pivot;
    }
    Recommendation::Pause
}

/// Full derivation: composites, overall, recommendation.
pub fn compute(scores: &Scores) -> ComputedScores {
    let product = product_score(scores);
    let business = business_score(scores);
    let personal = personal_score(scores);

    ComputedScores {
        overall_score: overall_score(product, business, personal),
        recommendation: recommend(scores, product, business),
        product_score: product,
        business_score: business,
        personal_score: personal,
    }
}
