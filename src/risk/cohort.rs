//! Cohort-wide dashboard counters.
//!
//! These are simple population screens over the latest vitals of every
//! patient, independent of the per-patient rule tables in [`super::rules`].

use serde::{Deserialize, Serialize};

use crate::models::DiabetesType;

use super::types::RiskLevel;

const CARDIO_AGE_ABOVE: u32 = 55;
const CARDIO_LDL_ABOVE: f64 = 130.0;
const CARDIO_MIN_FACTORS: usize = 2;
const HYPO_GLUCOSE_BELOW: f64 = 70.0;
const UNCONTROLLED_SYSTOLIC_ABOVE: f64 = 140.0;
const POLYPHARMACY_MIN_MEDICATIONS: u32 = 5;

/// Percentages above these mark a metric medium / high.
const METRIC_MEDIUM_ABOVE: u32 = 10;
const METRIC_HIGH_ABOVE: u32 = 15;

/// One patient's inputs to the cohort screens. Vitals fields come from the
/// most recent record and are `None` when the patient has none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortRow {
    pub age: u32,
    pub diabetes_type: Option<DiabetesType>,
    pub systolic: Option<f64>,
    pub glucose: Option<f64>,
    pub ldl: Option<f64>,
    pub medication_count: u32,
}

impl CohortRow {
    fn is_diabetic(&self) -> bool {
        self.diabetes_type.is_some()
    }

    fn cardiovascular_event_risk(&self) -> bool {
        let factors = [
            self.age > CARDIO_AGE_ABOVE,
            self.ldl.is_some_and(|ldl| ldl > CARDIO_LDL_ABOVE),
            self.is_diabetic(),
        ];
        factors.iter().filter(|f| **f).count() >= CARDIO_MIN_FACTORS
    }

    fn hypoglycemia_risk(&self) -> bool {
        self.is_diabetic() && self.glucose.is_some_and(|g| g < HYPO_GLUCOSE_BELOW)
    }

    fn uncontrolled_bp(&self) -> bool {
        self.systolic.is_some_and(|s| s > UNCONTROLLED_SYSTOLIC_ABOVE)
    }

    fn polypharmacy(&self) -> bool {
        self.medication_count >= POLYPHARMACY_MIN_MEDICATIONS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortMetric {
    pub label: String,
    pub patients: usize,
    /// Whole percent of the cohort.
    pub percentage: u32,
    pub level: RiskLevel,
}

impl CohortMetric {
    fn new(label: &str, patients: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (patients as f64 / total as f64 * 100.0).round() as u32
        };
        let level = if percentage > METRIC_HIGH_ABOVE {
            RiskLevel::High
        } else if percentage > METRIC_MEDIUM_ABOVE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        Self {
            label: label.to_string(),
            patients,
            percentage,
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub total_patients: usize,
    pub metrics: Vec<CohortMetric>,
}

/// Count each screen over the cohort and express it as a share of all patients.
pub fn summarize(rows: &[CohortRow]) -> CohortSummary {
    let total = rows.len();
    let count = |screen: fn(&CohortRow) -> bool| rows.iter().filter(|r| screen(r)).count();

    let metrics = vec![
        CohortMetric::new(
            "Cardiovascular Events",
            count(CohortRow::cardiovascular_event_risk),
            total,
        ),
        CohortMetric::new("Hypoglycemia Risk", count(CohortRow::hypoglycemia_risk), total),
        CohortMetric::new("Uncontrolled BP", count(CohortRow::uncontrolled_bp), total),
        CohortMetric::new("Polypharmacy Risk", count(CohortRow::polypharmacy), total),
    ];

    CohortSummary {
        total_patients: total,
        metrics,
    }
}
