use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::VitalsRecord;

use super::{format_datetime, parse_datetime, parse_uuid};

/// Insert a vitals record.
pub fn insert_vitals(conn: &Connection, vitals: &VitalsRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO vitals (id, patient_id, blood_pressure, hba1c, glucose, creatinine, ldl, cholesterol, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            vitals.id.to_string(),
            vitals.patient_id.to_string(),
            vitals.blood_pressure,
            vitals.hba1c,
            vitals.glucose,
            vitals.creatinine,
            vitals.ldl,
            vitals.cholesterol,
            format_datetime(&vitals.recorded_at),
        ],
    )?;
    tracing::info!(patient_id = %vitals.patient_id, vitals_id = %vitals.id, "Vitals recorded");
    Ok(())
}

/// Most recent vitals for a patient. Ties on `recorded_at` go to the row
/// inserted last.
pub fn get_latest_vitals(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Option<VitalsRecord>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, blood_pressure, hba1c, glucose, creatinine, ldl, cholesterol, recorded_at
             FROM vitals
             WHERE patient_id = ?1
             ORDER BY recorded_at DESC, rowid DESC
             LIMIT 1",
            params![patient_id.to_string()],
            vitals_row_from_rusqlite,
        )
        .optional()?;
    row.map(vitals_from_row).transpose()
}

/// Full vitals history for a patient, newest first.
pub fn list_vitals_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<VitalsRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, blood_pressure, hba1c, glucose, creatinine, ldl, cholesterol, recorded_at
         FROM vitals
         WHERE patient_id = ?1
         ORDER BY recorded_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map(params![patient_id.to_string()], vitals_row_from_rusqlite)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(vitals_from_row(row?)?);
    }
    Ok(records)
}

struct VitalsRow {
    id: String,
    patient_id: String,
    blood_pressure: Option<String>,
    hba1c: Option<f64>,
    glucose: Option<f64>,
    creatinine: Option<f64>,
    ldl: Option<f64>,
    cholesterol: Option<f64>,
    recorded_at: String,
}

fn vitals_row_from_rusqlite(row: &rusqlite::Row) -> rusqlite::Result<VitalsRow> {
    Ok(VitalsRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        blood_pressure: row.get(2)?,
        hba1c: row.get(3)?,
        glucose: row.get(4)?,
        creatinine: row.get(5)?,
        ldl: row.get(6)?,
        cholesterol: row.get(7)?,
        recorded_at: row.get(8)?,
    })
}

fn vitals_from_row(row: VitalsRow) -> Result<VitalsRecord, DatabaseError> {
    Ok(VitalsRecord {
        id: parse_uuid(&row.id)?,
        patient_id: parse_uuid(&row.patient_id)?,
        blood_pressure: row.blood_pressure,
        hba1c: row.hba1c,
        glucose: row.glucose,
        creatinine: row.creatinine,
        ldl: row.ldl,
        cholesterol: row.cholesterol,
        recorded_at: parse_datetime(&row.recorded_at),
    })
}
