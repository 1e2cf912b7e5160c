use std::str::FromStr;

use rusqlite::{ffi, params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{CognitiveStatus, DiabetesType, Gender, Mobility, Patient};

use super::{format_datetime, parse_datetime, parse_uuid};

const PATIENT_COLUMNS: &str = "id, name, mrn, age, gender, weight_kg, height_cm, frailty_score,
     conditions, diabetes_type, diabetes_duration_years, htn_duration_years, mobility,
     cognitive_status, medical_history, created_at, updated_at";

/// Insert a new patient. A duplicate MRN is a constraint violation.
pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let conditions = serde_json::to_string(&patient.conditions)?;
    conn.execute(
        "INSERT INTO patients (id, name, mrn, age, gender, weight_kg, height_cm, frailty_score,
         conditions, diabetes_type, diabetes_duration_years, htn_duration_years, mobility,
         cognitive_status, medical_history, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.mrn,
            patient.age,
            patient.gender.as_str(),
            patient.weight_kg,
            patient.height_cm,
            patient.frailty_score,
            conditions,
            patient.diabetes_type.map(|d| d.as_str()),
            patient.diabetes_duration_years,
            patient.htn_duration_years,
            patient.mobility.map(|m| m.as_str()),
            patient.cognitive_status.map(|c| c.as_str()),
            patient.medical_history,
            format_datetime(&patient.created_at),
            format_datetime(&patient.updated_at),
        ],
    )
    .map_err(|e| duplicate_mrn(e, &patient.mrn))?;

    tracing::info!(patient_id = %patient.id, mrn = %patient.mrn, "Patient created");
    Ok(())
}

/// Replace every editable column of an existing patient.
pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let conditions = serde_json::to_string(&patient.conditions)?;
    let affected = conn
        .execute(
            "UPDATE patients SET name = ?2, mrn = ?3, age = ?4, gender = ?5, weight_kg = ?6,
             height_cm = ?7, frailty_score = ?8, conditions = ?9, diabetes_type = ?10,
             diabetes_duration_years = ?11, htn_duration_years = ?12, mobility = ?13,
             cognitive_status = ?14, medical_history = ?15, updated_at = ?16
             WHERE id = ?1",
            params![
                patient.id.to_string(),
                patient.name,
                patient.mrn,
                patient.age,
                patient.gender.as_str(),
                patient.weight_kg,
                patient.height_cm,
                patient.frailty_score,
                conditions,
                patient.diabetes_type.map(|d| d.as_str()),
                patient.diabetes_duration_years,
                patient.htn_duration_years,
                patient.mobility.map(|m| m.as_str()),
                patient.cognitive_status.map(|c| c.as_str()),
                patient.medical_history,
                format_datetime(&patient.updated_at),
            ],
        )
        .map_err(|e| duplicate_mrn(e, &patient.mrn))?;

    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient.id.to_string(),
        });
    }
    tracing::info!(patient_id = %patient.id, "Patient updated");
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
            params![id.to_string()],
            patient_row_from_rusqlite,
        )
        .optional()?;
    row.map(patient_from_row).transpose()
}

/// Patients ordered by name, then creation time.
pub fn list_patients(
    conn: &Connection,
    offset: u32,
    limit: u32,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         ORDER BY name COLLATE NOCASE ASC, created_at ASC
         LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![limit, offset], patient_row_from_rusqlite)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

pub fn count_patients(conn: &Connection) -> Result<u32, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

/// Delete a patient; vitals and medications go with it.
pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM patients WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        });
    }
    tracing::info!(patient_id = %id, "Patient deleted");
    Ok(())
}

/// `mrn` is the only UNIQUE column on `patients`; the id clash is reported
/// as a PRIMARYKEY violation and stays a plain SQLite error.
fn duplicate_mrn(err: rusqlite::Error, mrn: &str) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DatabaseError::ConstraintViolation(format!("MRN {mrn} already exists"))
        }
        _ => DatabaseError::Sqlite(err),
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// Raw column values; enum and JSON decoding happens in `patient_from_row`
/// so that failures surface as `DatabaseError` rather than rusqlite errors.
struct PatientRow {
    id: String,
    name: String,
    mrn: String,
    age: u32,
    gender: String,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    frailty_score: Option<u8>,
    conditions: String,
    diabetes_type: Option<String>,
    diabetes_duration_years: Option<u32>,
    htn_duration_years: Option<u32>,
    mobility: Option<String>,
    cognitive_status: Option<String>,
    medical_history: Option<String>,
    created_at: String,
    updated_at: String,
}

fn patient_row_from_rusqlite(row: &rusqlite::Row) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        name: row.get(1)?,
        mrn: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        weight_kg: row.get(5)?,
        height_cm: row.get(6)?,
        frailty_score: row.get(7)?,
        conditions: row.get(8)?,
        diabetes_type: row.get(9)?,
        diabetes_duration_years: row.get(10)?,
        htn_duration_years: row.get(11)?,
        mobility: row.get(12)?,
        cognitive_status: row.get(13)?,
        medical_history: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: parse_uuid(&row.id)?,
        name: row.name,
        mrn: row.mrn,
        age: row.age,
        gender: Gender::from_str(&row.gender)?,
        weight_kg: row.weight_kg,
        height_cm: row.height_cm,
        frailty_score: row.frailty_score,
        conditions: serde_json::from_str(&row.conditions)?,
        diabetes_type: row.diabetes_type.as_deref().map(DiabetesType::from_str).transpose()?,
        diabetes_duration_years: row.diabetes_duration_years,
        htn_duration_years: row.htn_duration_years,
        mobility: row.mobility.as_deref().map(Mobility::from_str).transpose()?,
        cognitive_status: row
            .cognitive_status
            .as_deref()
            .map(CognitiveStatus::from_str)
            .transpose()?,
        medical_history: row.medical_history,
        created_at: parse_datetime(&row.created_at),
        updated_at: parse_datetime(&row.updated_at),
    })
}
