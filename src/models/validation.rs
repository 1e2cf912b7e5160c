// Range checks for patient, vitals and medication payloads accepted by the API.
// The risk engine never validates; out-of-range values are rejected here, before
// anything is stored.

use thiserror::Error;

use super::medication::MedicationDraft;
use super::patient::PatientDraft;
use super::vital_sign::{BloodPressure, VitalsDraft};

/// All violations found in one payload.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Validation failed: {}", .0.join("; "))]
pub struct ValidationError(pub Vec<String>);

impl ValidationError {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

fn check_range(
    errors: &mut Vec<String>,
    label: &str,
    value: Option<f64>,
    min: f64,
    max: f64,
    unit: &str,
) {
    if let Some(v) = value {
        if !v.is_finite() || v < min || v > max {
            errors.push(format!("{label} {v} out of range [{min}, {max}] {unit}"));
        }
    }
}

fn finish(errors: Vec<String>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

pub fn validate_patient(draft: &PatientDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    let name_len = draft.name.trim().chars().count();
    if !(2..=100).contains(&name_len) {
        errors.push("Name must be between 2 and 100 characters".to_string());
    }
    if !(60..=120).contains(&draft.age) {
        errors.push(format!("Age {} out of range [60, 120]", draft.age));
    }
    if draft.gender.is_none() {
        errors.push("Gender is required".to_string());
    }
    check_range(&mut errors, "Weight", draft.weight_kg, 30.0, 300.0, "kg");
    check_range(&mut errors, "Height", draft.height_cm, 100.0, 250.0, "cm");
    if let Some(score) = draft.frailty_score {
        if score > 5 {
            errors.push(format!("Frailty score {score} out of range [0, 5]"));
        }
    }
    if let Some(years) = draft.diabetes_duration_years {
        if years > 100 {
            errors.push(format!("Diabetes duration {years} out of range [0, 100] years"));
        }
    }
    if let Some(history) = &draft.medical_history {
        if history.chars().count() > 2000 {
            errors.push("Medical history must be less than 2000 characters".to_string());
        }
    }
    if draft.conditions.iter().any(|c| c.trim().is_empty()) {
        errors.push("Condition names must not be empty".to_string());
    }

    finish(errors)
}

pub fn validate_vitals(draft: &VitalsDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    check_range(&mut errors, "HbA1c", draft.hba1c, 3.0, 20.0, "%");
    check_range(&mut errors, "Glucose", draft.glucose, 40.0, 600.0, "mg/dL");
    check_range(&mut errors, "Creatinine", draft.creatinine, 0.2, 15.0, "mg/dL");
    check_range(&mut errors, "LDL", draft.ldl, 20.0, 400.0, "mg/dL");
    check_range(&mut errors, "Cholesterol", draft.cholesterol, 50.0, 500.0, "mg/dL");

    if let Some(raw) = draft.blood_pressure.as_deref().filter(|s| !s.trim().is_empty()) {
        match BloodPressure::parse_strict(raw) {
            Some(bp) => {
                check_range(&mut errors, "Systolic BP", Some(bp.systolic), 70.0, 250.0, "mmHg");
                check_range(&mut errors, "Diastolic BP", Some(bp.diastolic), 40.0, 150.0, "mmHg");
            }
            None => errors.push(format!("Blood pressure '{raw}' must look like 120/80")),
        }
    }

    finish(errors)
}

pub fn validate_medication(draft: &MedicationDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    if draft.drug_name.trim().is_empty() {
        errors.push("Drug name is required".to_string());
    }
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Gender;

    fn valid_patient() -> PatientDraft {
        PatientDraft {
            name: "Robert K.".into(),
            age: 71,
            gender: Some(Gender::Male),
            weight_kg: Some(82.0),
            height_cm: Some(176.0),
            frailty_score: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn valid_patient_passes() {
        assert!(validate_patient(&valid_patient()).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let draft = PatientDraft {
            name: "X".into(),
            age: 45,
            gender: None,
            weight_kg: Some(12.0),
            frailty_score: Some(9),
            ..Default::default()
        };
        let err = validate_patient(&draft).unwrap_err();
        assert_eq!(err.messages().len(), 5);
        assert!(err.to_string().starts_with("Validation failed: "));
    }

    #[test]
    fn age_bounds_are_inclusive() {
        let mut draft = valid_patient();
        draft.age = 60;
        assert!(validate_patient(&draft).is_ok());
        draft.age = 120;
        assert!(validate_patient(&draft).is_ok());
        draft.age = 121;
        assert!(validate_patient(&draft).is_err());
    }

    #[test]
    fn absent_optional_vitals_are_fine() {
        assert!(validate_vitals(&VitalsDraft::default()).is_ok());
    }

    #[test]
    fn malformed_blood_pressure_is_rejected() {
        let draft = VitalsDraft {
            blood_pressure: Some("high".into()),
            ..Default::default()
        };
        let err = validate_vitals(&draft).unwrap_err();
        assert_eq!(err.messages().len(), 1);
        assert!(err.messages()[0].contains("120/80"));
    }

    #[test]
    fn out_of_range_systolic_is_rejected() {
        let draft = VitalsDraft {
            blood_pressure: Some("300/80 mmHg".into()),
            hba1c: Some(8.5),
            ..Default::default()
        };
        let err = validate_vitals(&draft).unwrap_err();
        assert!(err.messages()[0].starts_with("Systolic BP 300"));
    }

    #[test]
    fn nan_lab_value_is_rejected() {
        let draft = VitalsDraft {
            glucose: Some(f64::NAN),
            ..Default::default()
        };
        assert!(validate_vitals(&draft).is_err());
    }

    #[test]
    fn medication_needs_a_name() {
        assert!(validate_medication(&MedicationDraft::default()).is_err());
        let draft = MedicationDraft {
            drug_name: "Metformin".into(),
            ..Default::default()
        };
        assert!(validate_medication(&draft).is_ok());
    }
}
