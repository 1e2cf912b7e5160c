use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CognitiveStatus, DiabetesType, Gender, Mobility};

/// A stored patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    /// Medical record number shown on the dashboard.
    pub mrn: String,
    pub age: u32,
    pub gender: Gender,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    /// 0-1 not frail, 2-3 moderately frail, 4-5 highly frail.
    pub frailty_score: Option<u8>,
    pub conditions: Vec<String>,
    pub diabetes_type: Option<DiabetesType>,
    pub diabetes_duration_years: Option<u32>,
    pub htn_duration_years: Option<u32>,
    pub mobility: Option<Mobility>,
    pub cognitive_status: Option<CognitiveStatus>,
    pub medical_history: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Demographic and history fields accepted when creating or replacing a patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientDraft {
    pub name: String,
    /// Generated when absent.
    #[serde(default)]
    pub mrn: Option<String>,
    pub age: u32,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub frailty_score: Option<u8>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub diabetes_type: Option<DiabetesType>,
    #[serde(default)]
    pub diabetes_duration_years: Option<u32>,
    #[serde(default)]
    pub htn_duration_years: Option<u32>,
    #[serde(default)]
    pub mobility: Option<Mobility>,
    #[serde(default)]
    pub cognitive_status: Option<CognitiveStatus>,
    #[serde(default)]
    pub medical_history: Option<String>,
}

/// Immutable view of a patient used for one risk evaluation.
///
/// `conditions` is a set: order never matters and duplicates collapse, so
/// the polypharmacy-style "more than three conditions" rule counts distinct
/// entries only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub age: u32,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub frailty_score: Option<u8>,
    pub conditions: BTreeSet<String>,
    pub diabetes_type: Option<DiabetesType>,
    pub diabetes_duration_years: Option<u32>,
    pub htn_duration_years: Option<u32>,
}

impl Patient {
    /// Build a new record from a validated draft.
    pub fn from_draft(draft: PatientDraft) -> Self {
        let now = super::timestamp_now();
        Self {
            id: Uuid::new_v4(),
            mrn: draft.mrn.clone().unwrap_or_else(generate_mrn),
            created_at: now,
            updated_at: now,
            name: String::new(),
            age: 0,
            gender: Gender::Other,
            weight_kg: None,
            height_cm: None,
            frailty_score: None,
            conditions: Vec::new(),
            diabetes_type: None,
            diabetes_duration_years: None,
            htn_duration_years: None,
            mobility: None,
            cognitive_status: None,
            medical_history: None,
        }
        .with_draft(draft)
    }

    /// Replace every editable field with the draft's values, keeping id,
    /// creation time and (unless the draft carries one) the MRN.
    pub fn with_draft(mut self, draft: PatientDraft) -> Self {
        self.name = draft.name.trim().to_string();
        if let Some(mrn) = draft.mrn {
            self.mrn = mrn;
        }
        self.age = draft.age;
        self.gender = draft.gender.unwrap_or(Gender::Other);
        self.weight_kg = draft.weight_kg;
        self.height_cm = draft.height_cm;
        self.frailty_score = draft.frailty_score;
        self.conditions = draft.conditions;
        self.diabetes_type = draft.diabetes_type;
        self.diabetes_duration_years = draft.diabetes_duration_years;
        self.htn_duration_years = draft.htn_duration_years;
        self.mobility = draft.mobility;
        self.cognitive_status = draft.cognitive_status;
        self.medical_history = draft.medical_history;
        self.updated_at = super::timestamp_now();
        self
    }

    pub fn snapshot(&self) -> PatientSnapshot {
        PatientSnapshot {
            age: self.age,
            gender: Some(self.gender),
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            frailty_score: self.frailty_score,
            conditions: self.conditions.iter().cloned().collect(),
            diabetes_type: self.diabetes_type,
            diabetes_duration_years: self.diabetes_duration_years,
            htn_duration_years: self.htn_duration_years,
        }
    }
}

/// `MRN` followed by six digits, matching the format the intake form used.
fn generate_mrn() -> String {
    let n = Uuid::new_v4().as_u128() % 900_000 + 100_000;
    format!("MRN{n}")
}
