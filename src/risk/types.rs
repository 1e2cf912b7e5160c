use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metrics::DerivedMetrics;

/// eGFR assumed when it cannot be computed (no creatinine, age or gender).
///
/// 120 mL/min/1.73m² means "normal renal function": incomplete labs must not
/// inflate any renal rule.
pub const DEFAULT_EGFR_WHEN_UNKNOWN: f64 = 120.0;

/// Upper bound of every category score.
pub const MAX_SCORE: u32 = 100;

// ---------------------------------------------------------------------------
// RiskCategory
// ---------------------------------------------------------------------------

/// The four fixed scoring categories, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    CardiovascularRisk,
    HypoglycemiaRisk,
    BloodPressureControlRisk,
    AdverseEventRisk,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::CardiovascularRisk,
        RiskCategory::HypoglycemiaRisk,
        RiskCategory::BloodPressureControlRisk,
        RiskCategory::AdverseEventRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CardiovascularRisk => "cardiovascular_risk",
            Self::HypoglycemiaRisk => "hypoglycemia_risk",
            Self::BloodPressureControlRisk => "blood_pressure_control_risk",
            Self::AdverseEventRisk => "adverse_event_risk",
        }
    }

    /// Score thresholds for this category. Both bounds are exclusive.
    pub fn bands(&self) -> LevelBands {
        match self {
            Self::CardiovascularRisk => LevelBands::new(35, 65),
            Self::HypoglycemiaRisk => LevelBands::new(20, 50),
            Self::BloodPressureControlRisk => LevelBands::new(25, 55),
            Self::AdverseEventRisk => LevelBands::new(30, 60),
        }
    }
}

// ---------------------------------------------------------------------------
// RiskLevel & LevelBands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-threshold banding: `score > high_above` is high, `score > medium_above`
/// is medium, anything else is low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBands {
    pub medium_above: u32,
    pub high_above: u32,
}

impl LevelBands {
    pub const fn new(medium_above: u32, high_above: u32) -> Self {
        Self {
            medium_above,
            high_above,
        }
    }

    pub fn level_for(&self, score: u32) -> RiskLevel {
        if score > self.high_above {
            RiskLevel::High
        } else if score > self.medium_above {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Factors & results
// ---------------------------------------------------------------------------

/// How strongly a triggered rule moved the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTier {
    Low,
    Medium,
    High,
}

impl ImpactTier {
    /// ≥ 30 points is high, ≥ 15 medium, anything smaller low.
    pub fn from_points(points: u32) -> Self {
        if points >= 30 {
            Self::High
        } else if points >= 15 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One triggered rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub impact: ImpactTier,
    pub points: u32,
}

/// Score, level and explanation for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskResult {
    pub category: RiskCategory,
    pub score: u32,
    pub level: RiskLevel,
    /// Triggered rules in evaluation order.
    pub factors: Vec<RiskFactor>,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Recommendations only exist for medium and high results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Medium,
    High,
}

impl Priority {
    pub fn from_level(level: RiskLevel) -> Option<Self> {
        match level {
            RiskLevel::Low => None,
            RiskLevel::Medium => Some(Self::Medium),
            RiskLevel::High => Some(Self::High),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RiskCategory,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

// ---------------------------------------------------------------------------
// RiskAssessment
// ---------------------------------------------------------------------------

/// Everything one evaluation produces for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub derived: DerivedMetrics,
    /// eGFR the renal rules actually used.
    pub egfr_used: f64,
    pub results: [RiskResult; 4],
    pub recommendations: Vec<Recommendation>,
    /// Highest level across all categories.
    pub overall_level: RiskLevel,
}

impl RiskAssessment {
    pub fn result(&self, category: RiskCategory) -> &RiskResult {
        // `results` always follows `RiskCategory::ALL` order.
        let index = RiskCategory::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(0);
        &self.results[index]
    }
}

// ---------------------------------------------------------------------------
// ScoringError
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("No vitals recorded; risk scoring needs a vitals record")]
    MissingVitals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_strictly_greater_than() {
        let cv = RiskCategory::CardiovascularRisk.bands();
        assert_eq!(cv.level_for(35), RiskLevel::Low);
        assert_eq!(cv.level_for(36), RiskLevel::Medium);
        assert_eq!(cv.level_for(65), RiskLevel::Medium);
        assert_eq!(cv.level_for(66), RiskLevel::High);
    }

    #[test]
    fn every_category_has_ordered_bands() {
        for category in RiskCategory::ALL {
            let bands = category.bands();
            assert!(bands.medium_above < bands.high_above, "{category:?}");
            assert!(bands.high_above < MAX_SCORE);
        }
    }

    #[test]
    fn impact_tiers_from_points() {
        assert_eq!(ImpactTier::from_points(60), ImpactTier::High);
        assert_eq!(ImpactTier::from_points(30), ImpactTier::High);
        assert_eq!(ImpactTier::from_points(25), ImpactTier::Medium);
        assert_eq!(ImpactTier::from_points(15), ImpactTier::Medium);
        assert_eq!(ImpactTier::from_points(10), ImpactTier::Low);
    }

    #[test]
    fn low_level_has_no_priority() {
        assert_eq!(Priority::from_level(RiskLevel::Low), None);
        assert_eq!(Priority::from_level(RiskLevel::Medium), Some(Priority::Medium));
        assert_eq!(Priority::from_level(RiskLevel::High), Some(Priority::High));
        assert!(Priority::High > Priority::Medium);
    }

    #[test]
    fn level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&RiskCategory::BloodPressureControlRisk).unwrap();
        assert_eq!(json, "\"blood_pressure_control_risk\"");
        for category in RiskCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
