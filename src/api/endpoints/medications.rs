//! Medication endpoints.
//!
//! - `GET  /api/patients/:id/medications` - current list
//! - `POST /api/patients/:id/medications` - add one medication

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::endpoints::{parse_patient_id, require_patient};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{validate_medication, Medication, MedicationDraft};

#[derive(Serialize)]
pub struct MedicationsResponse {
    pub patient_id: Uuid,
    pub medications: Vec<Medication>,
    pub total: usize,
}

/// `GET /api/patients/:id/medications`
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<MedicationsResponse>, ApiError> {
    let id = parse_patient_id(&patient_id)?;
    let conn = ctx.open_db()?;
    require_patient(&conn, &id)?;

    let medications = db::list_medications_for_patient(&conn, &id)?;
    Ok(Json(MedicationsResponse {
        patient_id: id,
        total: medications.len(),
        medications,
    }))
}

/// `POST /api/patients/:id/medications`
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    payload: Result<Json<MedicationDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Medication>), ApiError> {
    let id = parse_patient_id(&patient_id)?;
    let Json(draft) = payload?;
    validate_medication(&draft)?;

    let conn = ctx.open_db()?;
    require_patient(&conn, &id)?;

    let medication = Medication::from_draft(id, draft);
    db::insert_medication(&conn, &medication)?;
    Ok((StatusCode::CREATED, Json(medication)))
}
