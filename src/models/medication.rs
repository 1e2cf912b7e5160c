use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub drug_name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicationDraft {
    pub drug_name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
}

impl Medication {
    pub fn from_draft(patient_id: Uuid, draft: MedicationDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            drug_name: draft.drug_name.trim().to_string(),
            dosage: draft.dosage,
            frequency: draft.frequency,
            created_at: super::timestamp_now(),
        }
    }
}
