use std::str::FromStr;

use rusqlite::Connection;

use crate::db::DatabaseError;
use crate::models::{BloodPressure, DiabetesType};
use crate::risk::CohortRow;

use super::{count_medications_by_patient, parse_uuid};

/// One row per patient with their latest vitals (if any) and medication count.
pub fn load_cohort_rows(conn: &Connection) -> Result<Vec<CohortRow>, DatabaseError> {
    let medication_counts = count_medications_by_patient(conn)?;
    let mut stmt = conn.prepare(
        "SELECT p.id, p.age, p.diabetes_type, v.blood_pressure, v.glucose, v.ldl
         FROM patients p
         LEFT JOIN vitals v ON v.id = (
             SELECT id FROM vitals
             WHERE patient_id = p.id
             ORDER BY recorded_at DESC, rowid DESC
             LIMIT 1
         )",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, u32>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<f64>>(4)?,
            row.get::<_, Option<f64>>(5)?,
        ))
    })?;

    let mut cohort = Vec::new();
    for row in rows {
        let (id, age, diabetes_type, blood_pressure, glucose, ldl) = row?;
        let medication_count = medication_counts
            .get(&parse_uuid(&id)?)
            .copied()
            .unwrap_or(0);
        cohort.push(CohortRow {
            age,
            diabetes_type: diabetes_type
                .as_deref()
                .map(DiabetesType::from_str)
                .transpose()?,
            systolic: blood_pressure
                .as_deref()
                .map(|bp| BloodPressure::parse(bp).systolic),
            glucose,
            ldl,
            medication_count,
        });
    }
    tracing::debug!(patients = cohort.len(), "Cohort rows loaded");
    Ok(cohort)
}
