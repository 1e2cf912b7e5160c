use crate::models::{PatientSnapshot, VitalsSnapshot};

use super::metrics::DerivedMetrics;
use super::recommendations::derive_recommendations;
use super::rules::{rules_for, RuleInputs};
use super::types::{
    ImpactTier, RiskAssessment, RiskCategory, RiskFactor, RiskLevel, RiskResult, ScoringError,
    MAX_SCORE,
};

/// Run one category's rule table: sum triggered points, clamp, band.
pub fn score_category(category: RiskCategory, inputs: &RuleInputs<'_>) -> RiskResult {
    let factors: Vec<RiskFactor> = rules_for(category)
        .iter()
        .filter(|rule| (rule.applies)(inputs))
        .map(|rule| RiskFactor {
            name: rule.name.to_string(),
            impact: ImpactTier::from_points(rule.points),
            points: rule.points,
        })
        .collect();

    let score = factors
        .iter()
        .map(|f| f.points)
        .sum::<u32>()
        .min(MAX_SCORE);

    RiskResult {
        category,
        score,
        level: category.bands().level_for(score),
        factors,
    }
}

/// Score all four categories, in [`RiskCategory::ALL`] order.
///
/// Pure and deterministic: no I/O, no clock, no shared state.
pub fn score_risks(
    patient: &PatientSnapshot,
    vitals: &VitalsSnapshot,
    derived: &DerivedMetrics,
) -> [RiskResult; 4] {
    let inputs = RuleInputs::resolve(patient, vitals, derived);
    RiskCategory::ALL.map(|category| score_category(category, &inputs))
}

/// Full evaluation for one patient: derived metrics, category results,
/// recommendations and the overall level.
///
/// Refuses to score without vitals rather than treating every lab as zero.
pub fn assess(
    patient: &PatientSnapshot,
    vitals: Option<&VitalsSnapshot>,
) -> Result<RiskAssessment, ScoringError> {
    let vitals = vitals.ok_or(ScoringError::MissingVitals)?;

    let derived = DerivedMetrics::compute(patient, vitals);
    let inputs = RuleInputs::resolve(patient, vitals, &derived);
    let results = RiskCategory::ALL.map(|category| score_category(category, &inputs));
    let recommendations = derive_recommendations(&results);
    let overall_level = results
        .iter()
        .map(|r| r.level)
        .max()
        .unwrap_or(RiskLevel::Low);

    tracing::debug!(
        cardiovascular = results[0].score,
        hypoglycemia = results[1].score,
        blood_pressure = results[2].score,
        adverse_event = results[3].score,
        egfr_used = inputs.egfr,
        recommendations = recommendations.len(),
        "Risk assessment complete"
    );

    Ok(RiskAssessment {
        derived,
        egfr_used: inputs.egfr,
        results,
        recommendations,
        overall_level,
    })
}
