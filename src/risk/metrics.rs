//! Derived clinical metrics: BMI and eGFR.
//!
//! Both are recomputed on every evaluation and never stored as
//! authoritative values. `None` always means "unknown", never zero.

use serde::{Deserialize, Serialize};

use crate::models::{Gender, PatientSnapshot, VitalsSnapshot};

/// CKD-EPI style constants for the female branch.
const FEMALE_KAPPA: f64 = 0.7;
const FEMALE_ALPHA: f64 = -0.329;
const FEMALE_FACTOR: f64 = 1.018;

/// Constants for every other gender value, including `Other`.
const MALE_KAPPA: f64 = 0.9;
const MALE_ALPHA: f64 = -0.411;

const EGFR_BASE: f64 = 141.0;
const EGFR_UPPER_EXPONENT: f64 = -1.209;
const EGFR_AGE_DECAY: f64 = 0.993;

/// Metrics computed from a patient snapshot and their latest vitals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// kg/m², rounded to 2 decimals.
    pub bmi: Option<f64>,
    /// mL/min/1.73m², rounded to 2 decimals.
    pub egfr: Option<f64>,
}

impl DerivedMetrics {
    pub fn compute(patient: &PatientSnapshot, vitals: &VitalsSnapshot) -> Self {
        let bmi = match (patient.weight_kg, patient.height_cm) {
            (Some(weight), Some(height)) => compute_bmi(weight, height),
            _ => None,
        };
        let egfr = match (vitals.creatinine_mg_dl, patient.gender) {
            (Some(creatinine), Some(gender)) => compute_egfr(creatinine, patient.age, gender),
            _ => None,
        };
        Self { bmi, egfr }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Body mass index from weight (kg) and height (cm).
///
/// Returns `None` unless both inputs are finite and positive.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !(weight_kg.is_finite() && height_cm.is_finite()) || weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(round2(weight_kg / (height_m * height_m)))
}

/// Estimated glomerular filtration rate from serum creatinine (mg/dL),
/// age (years) and gender.
///
/// The `-1.209` exponent is applied to `max(ratio, 1)` unconditionally, so
/// it is neutral whenever creatinine is below kappa. Genders other than
/// female use the male constants.
pub fn compute_egfr(creatinine_mg_dl: f64, age_years: u32, gender: Gender) -> Option<f64> {
    if !creatinine_mg_dl.is_finite() || creatinine_mg_dl <= 0.0 || age_years == 0 {
        return None;
    }
    let age = i32::try_from(age_years).ok()?;

    let (kappa, alpha, female_factor) = if gender.is_female() {
        (FEMALE_KAPPA, FEMALE_ALPHA, FEMALE_FACTOR)
    } else {
        (MALE_KAPPA, MALE_ALPHA, 1.0)
    };

    let ratio = creatinine_mg_dl / kappa;
    let egfr = EGFR_BASE
        * ratio.min(1.0).powf(alpha)
        * ratio.max(1.0).powf(EGFR_UPPER_EXPONENT)
        * EGFR_AGE_DECAY.powi(age)
        * female_factor;

    Some(round2(egfr))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn bmi_requires_positive_inputs() {
        assert_eq!(compute_bmi(0.0, 170.0), None);
        assert_eq!(compute_bmi(70.0, 0.0), None);
        assert_eq!(compute_bmi(-70.0, 170.0), None);
        assert_eq!(compute_bmi(f64::NAN, 170.0), None);
    }

    #[test]
    fn bmi_is_rounded_to_two_decimals() {
        assert_eq!(compute_bmi(70.0, 175.0), Some(22.86));
    }

    #[test]
    fn egfr_golden_value_male() {
        assert_eq!(compute_egfr(1.0, 70, Gender::Male), Some(75.92));
    }

    #[test]
    fn egfr_other_gender_uses_male_constants() {
        assert_eq!(
            compute_egfr(1.0, 70, Gender::Other),
            compute_egfr(1.0, 70, Gender::Male)
        );
    }

    #[test]
    fn egfr_female_low_creatinine_uses_alpha_branch() {
        // ratio < 1: only the alpha term contributes.
        let egfr = compute_egfr(0.6, 80, Gender::Female).unwrap();
        assert!((egfr - 86.09).abs() < 0.011, "got {egfr}");
    }

    #[test]
    fn egfr_rejects_missing_or_nonpositive_inputs() {
        assert_eq!(compute_egfr(0.0, 70, Gender::Male), None);
        assert_eq!(compute_egfr(-1.0, 70, Gender::Male), None);
        assert_eq!(compute_egfr(1.0, 0, Gender::Female), None);
    }

    #[test]
    fn egfr_rejects_ages_beyond_i32() {
        assert_eq!(compute_egfr(1.0, u32::MAX, Gender::Male), None);
        assert_eq!(compute_egfr(1.0, i32::MAX as u32 + 1, Gender::Female), None);
        assert!(compute_egfr(1.0, i32::MAX as u32, Gender::Male).is_some());
    }

    #[test]
    fn egfr_decreases_with_creatinine() {
        let low = compute_egfr(1.0, 76, Gender::Male).unwrap();
        let high = compute_egfr(2.0, 76, Gender::Male).unwrap();
        assert!(high < low);
    }

    #[test]
    fn derived_metrics_need_gender_for_egfr() {
        let patient = PatientSnapshot {
            age: 76,
            gender: None,
            weight_kg: Some(89.59),
            height_cm: Some(170.0),
            conditions: BTreeSet::new(),
            ..Default::default()
        };
        let vitals = VitalsSnapshot {
            creatinine_mg_dl: Some(1.26),
            ..Default::default()
        };
        let derived = DerivedMetrics::compute(&patient, &vitals);
        assert_eq!(derived.bmi, Some(31.0));
        assert_eq!(derived.egfr, None);

        let patient = PatientSnapshot {
            gender: Some(Gender::Male),
            ..patient
        };
        let derived = DerivedMetrics::compute(&patient, &vitals);
        assert_eq!(derived.egfr, Some(55.04));
    }
}
