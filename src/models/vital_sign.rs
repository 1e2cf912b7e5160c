use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A systolic/diastolic pair in mmHg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

impl BloodPressure {
    /// Lenient parse of an `"S/D"` reading (an optional `mmHg` suffix is
    /// ignored). Missing or unparseable parts become 0.
    pub fn parse(raw: &str) -> Self {
        let (systolic, diastolic) = split_reading(raw);
        Self {
            systolic: systolic.unwrap_or(0.0),
            diastolic: diastolic.unwrap_or(0.0),
        }
    }

    /// Strict parse: both parts must be present and numeric.
    pub fn parse_strict(raw: &str) -> Option<Self> {
        match split_reading(raw) {
            (Some(systolic), Some(diastolic)) => Some(Self {
                systolic,
                diastolic,
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} mmHg", self.systolic, self.diastolic)
    }
}

fn split_reading(raw: &str) -> (Option<f64>, Option<f64>) {
    let cleaned = raw.trim().trim_end_matches("mmHg").trim();
    let mut parts = cleaned.splitn(2, '/');
    let parse = |part: Option<&str>| part.and_then(|p| p.trim().parse::<f64>().ok());
    let systolic = parse(parts.next());
    let diastolic = parse(parts.next());
    (systolic, diastolic)
}

/// One recorded set of vitals and labs for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    /// Raw `"S/D mmHg"` reading as entered.
    pub blood_pressure: Option<String>,
    /// Percent.
    pub hba1c: Option<f64>,
    /// mg/dL.
    pub glucose: Option<f64>,
    /// Serum creatinine, mg/dL.
    pub creatinine: Option<f64>,
    pub ldl: Option<f64>,
    pub cholesterol: Option<f64>,
    pub recorded_at: NaiveDateTime,
}

/// Vitals fields accepted by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalsDraft {
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub hba1c: Option<f64>,
    #[serde(default)]
    pub glucose: Option<f64>,
    #[serde(default)]
    pub creatinine: Option<f64>,
    #[serde(default)]
    pub ldl: Option<f64>,
    #[serde(default)]
    pub cholesterol: Option<f64>,
}

/// The latest vitals, as consumed by the risk engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    pub hba1c: Option<f64>,
    pub glucose: Option<f64>,
    pub blood_pressure: BloodPressure,
    pub creatinine_mg_dl: Option<f64>,
    pub ldl: Option<f64>,
    pub cholesterol: Option<f64>,
}

impl VitalsRecord {
    pub fn from_draft(patient_id: Uuid, draft: VitalsDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            blood_pressure: draft
                .blood_pressure
                .map(|bp| bp.trim().to_string())
                .filter(|bp| !bp.is_empty()),
            hba1c: draft.hba1c,
            glucose: draft.glucose,
            creatinine: draft.creatinine,
            ldl: draft.ldl,
            cholesterol: draft.cholesterol,
            recorded_at: super::timestamp_now(),
        }
    }

    pub fn snapshot(&self) -> VitalsSnapshot {
        VitalsSnapshot {
            hba1c: self.hba1c,
            glucose: self.glucose,
            blood_pressure: self
                .blood_pressure
                .as_deref()
                .map(BloodPressure::parse)
                .unwrap_or_default(),
            creatinine_mg_dl: self.creatinine,
            ldl: self.ldl,
            cholesterol: self.cholesterol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reading_with_unit() {
        let bp = BloodPressure::parse("148/92 mmHg");
        assert_eq!(bp.systolic, 148.0);
        assert_eq!(bp.diastolic, 92.0);
    }

    #[test]
    fn parses_reading_with_spaces() {
        let bp = BloodPressure::parse(" 130 / 85 ");
        assert_eq!(bp, BloodPressure { systolic: 130.0, diastolic: 85.0 });
    }

    #[test]
    fn unparseable_parts_default_to_zero() {
        assert_eq!(BloodPressure::parse("N/A/N/A mmHg"), BloodPressure::default());
        let bp = BloodPressure::parse("150/N/A mmHg");
        assert_eq!(bp.systolic, 150.0);
        assert_eq!(bp.diastolic, 0.0);
        assert_eq!(BloodPressure::parse(""), BloodPressure::default());
        assert_eq!(BloodPressure::parse("165").systolic, 165.0);
    }

    #[test]
    fn strict_parse_requires_both_parts() {
        assert!(BloodPressure::parse_strict("120/80").is_some());
        assert!(BloodPressure::parse_strict("120").is_none());
        assert!(BloodPressure::parse_strict("abc/80").is_none());
    }

    #[test]
    fn display_includes_unit() {
        let bp = BloodPressure { systolic: 120.0, diastolic: 80.0 };
        assert_eq!(bp.to_string(), "120/80 mmHg");
    }

    #[test]
    fn snapshot_without_reading_has_zero_pressure() {
        let record = VitalsRecord::from_draft(
            Uuid::new_v4(),
            VitalsDraft {
                blood_pressure: Some("   ".into()),
                hba1c: Some(7.1),
                ..Default::default()
            },
        );
        assert!(record.blood_pressure.is_none());
        let snapshot = record.snapshot();
        assert_eq!(snapshot.blood_pressure, BloodPressure::default());
        assert_eq!(snapshot.hba1c, Some(7.1));
    }

    #[test]
    fn snapshot_maps_creatinine() {
        let record = VitalsRecord::from_draft(
            Uuid::new_v4(),
            VitalsDraft {
                blood_pressure: Some("165/95 mmHg".into()),
                creatinine: Some(1.26),
                ..Default::default()
            },
        );
        let snapshot = record.snapshot();
        assert_eq!(snapshot.creatinine_mg_dl, Some(1.26));
        assert_eq!(snapshot.blood_pressure.systolic, 165.0);
    }
}
