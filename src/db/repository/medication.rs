use std::collections::HashMap;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Medication;

use super::{format_datetime, parse_datetime, parse_uuid};

pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, patient_id, drug_name, dosage, frequency, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            med.id.to_string(),
            med.patient_id.to_string(),
            med.drug_name,
            med.dosage,
            med.frequency,
            format_datetime(&med.created_at),
        ],
    )?;
    tracing::info!(patient_id = %med.patient_id, drug = %med.drug_name, "Medication added");
    Ok(())
}

/// Medications for a patient in the order they were added.
pub fn list_medications_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, drug_name, dosage, frequency, created_at
         FROM medications
         WHERE patient_id = ?1
         ORDER BY created_at ASC, rowid ASC",
    )?;
    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut meds = Vec::new();
    for row in rows {
        let (id, patient_id, drug_name, dosage, frequency, created_at) = row?;
        meds.push(Medication {
            id: parse_uuid(&id)?,
            patient_id: parse_uuid(&patient_id)?,
            drug_name,
            dosage,
            frequency,
            created_at: parse_datetime(&created_at),
        });
    }
    Ok(meds)
}

/// Medication count per patient id. Patients without medications are absent.
pub fn count_medications_by_patient(
    conn: &Connection,
) -> Result<HashMap<Uuid, u32>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT patient_id, COUNT(*) FROM medications GROUP BY patient_id")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
    })?;

    let mut counts = HashMap::new();
    for row in rows {
        let (patient_id, count) = row?;
        counts.insert(parse_uuid(&patient_id)?, count);
    }
    Ok(counts)
}
