use std::collections::BTreeSet;

use crate::models::{PatientSnapshot, VitalsSnapshot};

use super::metrics::DerivedMetrics;
use super::types::{RiskCategory, DEFAULT_EGFR_WHEN_UNKNOWN};

/// Inputs every rule reads, with the missing-value policy already applied:
/// eGFR falls back to [`DEFAULT_EGFR_WHEN_UNKNOWN`]; other absent numbers
/// stay `None` and never satisfy a threshold.
#[derive(Debug, Clone, Copy)]
pub struct RuleInputs<'a> {
    pub age: u32,
    pub frailty_score: Option<u8>,
    pub conditions: &'a BTreeSet<String>,
    pub bmi: Option<f64>,
    pub egfr: f64,
    pub hba1c: Option<f64>,
    pub systolic_bp: f64,
}

impl<'a> RuleInputs<'a> {
    pub fn resolve(
        patient: &'a PatientSnapshot,
        vitals: &VitalsSnapshot,
        derived: &DerivedMetrics,
    ) -> Self {
        Self {
            age: patient.age,
            frailty_score: patient.frailty_score,
            conditions: &patient.conditions,
            bmi: derived.bmi,
            egfr: derived.egfr.unwrap_or(DEFAULT_EGFR_WHEN_UNKNOWN),
            hba1c: vitals.hba1c,
            systolic_bp: vitals.blood_pressure.systolic,
        }
    }

    fn frailty_at_least(&self, min: u8) -> bool {
        self.frailty_score.is_some_and(|f| f >= min)
    }
}

fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

/// A boolean trigger worth a fixed number of points.
pub struct Rule {
    pub name: &'static str,
    pub points: u32,
    pub applies: fn(&RuleInputs<'_>) -> bool,
}

// ---------------------------------------------------------------------------
// Cardiovascular
// ---------------------------------------------------------------------------

fn cv_age(i: &RuleInputs<'_>) -> bool {
    i.age > 70
}

fn cv_hypertension(i: &RuleInputs<'_>) -> bool {
    i.conditions.contains("Hypertension")
}

fn cv_obesity(i: &RuleInputs<'_>) -> bool {
    exceeds(i.bmi, 30.0)
}

fn cv_reduced_egfr(i: &RuleInputs<'_>) -> bool {
    i.egfr < 60.0
}

fn cv_hba1c(i: &RuleInputs<'_>) -> bool {
    exceeds(i.hba1c, 8.0)
}

const CARDIOVASCULAR_RULES: &[Rule] = &[
    Rule { name: "Age > 70", points: 25, applies: cv_age },
    Rule { name: "Hypertension", points: 20, applies: cv_hypertension },
    Rule { name: "BMI > 30", points: 15, applies: cv_obesity },
    Rule { name: "eGFR < 60", points: 15, applies: cv_reduced_egfr },
    Rule { name: "HbA1c > 8%", points: 10, applies: cv_hba1c },
];

// ---------------------------------------------------------------------------
// Hypoglycemia
// ---------------------------------------------------------------------------

fn hypo_tight_control_in_vulnerable(i: &RuleInputs<'_>) -> bool {
    exceeds(i.hba1c, 9.0) && (i.age >= 80 || i.frailty_at_least(4))
}

fn hypo_renal_clearance(i: &RuleInputs<'_>) -> bool {
    i.egfr < 45.0
}

fn hypo_frailty(i: &RuleInputs<'_>) -> bool {
    i.frailty_at_least(2)
}

const HYPOGLYCEMIA_RULES: &[Rule] = &[
    Rule {
        name: "HbA1c > 9% with age >= 80 or high frailty",
        points: 50,
        applies: hypo_tight_control_in_vulnerable,
    },
    Rule { name: "eGFR < 45", points: 30, applies: hypo_renal_clearance },
    Rule { name: "Frailty score >= 2", points: 15, applies: hypo_frailty },
];

// ---------------------------------------------------------------------------
// Blood pressure control
// ---------------------------------------------------------------------------

fn bp_stage_two(i: &RuleInputs<'_>) -> bool {
    i.systolic_bp >= 160.0
}

/// The lower branch of the stage rule; never fires together with stage two.
fn bp_stage_one(i: &RuleInputs<'_>) -> bool {
    i.systolic_bp >= 140.0 && i.systolic_bp < 160.0
}

fn bp_geriatric_target(i: &RuleInputs<'_>) -> bool {
    i.age > 75 && i.systolic_bp > 140.0
}

const BLOOD_PRESSURE_RULES: &[Rule] = &[
    Rule { name: "Systolic BP >= 160", points: 60, applies: bp_stage_two },
    Rule { name: "Systolic BP 140-159", points: 30, applies: bp_stage_one },
    Rule {
        name: "Age > 75 with systolic BP > 140",
        points: 20,
        applies: bp_geriatric_target,
    },
];

// ---------------------------------------------------------------------------
// Adverse events
// ---------------------------------------------------------------------------

fn ae_high_frailty(i: &RuleInputs<'_>) -> bool {
    i.frailty_at_least(4)
}

fn ae_reduced_egfr(i: &RuleInputs<'_>) -> bool {
    i.egfr < 60.0
}

fn ae_multimorbidity(i: &RuleInputs<'_>) -> bool {
    i.conditions.len() > 3
}

const ADVERSE_EVENT_RULES: &[Rule] = &[
    Rule { name: "High frailty (score >= 4)", points: 40, applies: ae_high_frailty },
    Rule { name: "eGFR < 60", points: 30, applies: ae_reduced_egfr },
    Rule { name: "More than 3 conditions", points: 15, applies: ae_multimorbidity },
];

/// Ordered rule table for a category.
pub fn rules_for(category: RiskCategory) -> &'static [Rule] {
    match category {
        RiskCategory::CardiovascularRisk => CARDIOVASCULAR_RULES,
        RiskCategory::HypoglycemiaRisk => HYPOGLYCEMIA_RULES,
        RiskCategory::BloodPressureControlRisk => BLOOD_PRESSURE_RULES,
        RiskCategory::AdverseEventRisk => ADVERSE_EVENT_RULES,
    }
}
