//! API endpoint handlers.
//!
//! Handlers are thin: parse and validate, call the repository or risk
//! engine, shape the JSON response.

pub mod dashboard;
pub mod health;
pub mod medications;
pub mod patients;
pub mod risk;
pub mod vitals;

use rusqlite::Connection;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::db;
use crate::models::Patient;

/// Parse a path id, rejecting malformed values with 400.
pub(crate) fn parse_patient_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("Invalid patient ID: {e}")))
}

/// Load a patient or fail with 404.
pub(crate) fn require_patient(conn: &Connection, id: &Uuid) -> Result<Patient, ApiError> {
    db::get_patient(conn, id)?.ok_or_else(|| ApiError::NotFound("Patient not found".into()))
}
