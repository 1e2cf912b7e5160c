use std::cmp::Reverse;

use super::types::{Priority, Recommendation, RiskCategory, RiskLevel, RiskResult};

/// Fixed (title, description) for a category at a given level.
///
/// Only medium and high have entries; low never produces a recommendation.
fn recommendation_text(category: RiskCategory, level: RiskLevel) -> Option<(&'static str, &'static str)> {
    use RiskCategory::*;
    use RiskLevel::*;

    let text = match (category, level) {
        (_, Low) => return None,
        (CardiovascularRisk, High) => (
            "Cardiovascular Risk Management",
            "Consider ACE inhibitor dose adjustment and statin therapy optimization",
        ),
        (CardiovascularRisk, Medium) => (
            "Cardiovascular Risk Review",
            "Review lipid profile and blood pressure targets at the next visit",
        ),
        (HypoglycemiaRisk, High) => (
            "Hypoglycemia Prevention",
            "Relax glycemic targets and review insulin or sulfonylurea dosing",
        ),
        (HypoglycemiaRisk, Medium) => (
            "Hypoglycemia Education",
            "Patient education on recognition and management of hypoglycemic episodes",
        ),
        (BloodPressureControlRisk, High) => (
            "Intensify Blood Pressure Control",
            "Adjust antihypertensive therapy and recheck blood pressure within 1 week",
        ),
        (BloodPressureControlRisk, Medium) => (
            "Blood Pressure Monitoring",
            "Increase monitoring frequency to weekly for 4 weeks",
        ),
        (AdverseEventRisk, High) => (
            "Comprehensive Medication Review",
            "Deprescribing review with renal dose adjustment for all active medications",
        ),
        (AdverseEventRisk, Medium) => (
            "Medication Review",
            "Schedule comprehensive medication review within 2 weeks",
        ),
    };
    Some(text)
}

/// One recommendation per medium or high result, high priority first.
///
/// The sort is stable, so results of equal priority keep category order.
pub fn derive_recommendations(results: &[RiskResult]) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = results
        .iter()
        .filter_map(|result| {
            let priority = Priority::from_level(result.level)?;
            let (title, description) = recommendation_text(result.category, result.level)?;
            Some(Recommendation {
                category: result.category,
                title: title.to_string(),
                description: description.to_string(),
                priority,
            })
        })
        .collect();

    recommendations.sort_by_key(|r| Reverse(r.priority));
    recommendations
}
