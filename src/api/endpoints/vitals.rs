//! Vitals endpoints.
//!
//! - `GET  /api/patients/:id/vitals` - history, newest first
//! - `POST /api/patients/:id/vitals` - record a new set of vitals

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
use crate::models::{validate_vitals, VitalsDraft, VitalsRecord};

#[derive(Serialize)]
pub struct VitalsHistoryResponse {
    pub patient_id: Uuid,
    pub vitals: Vec<VitalsRecord>,
}

/// `GET /api/patients/:id/vitals`
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<VitalsHistoryResponse>, ApiError> {
    let id = parse_patient_id(&patient_id)?;
    let conn = ctx.open_db()?;
    require_patient(&conn, &id)?;

    let vitals = db::list_vitals_for_patient(&conn, &id)?;
    Ok(Json(VitalsHistoryResponse {
        patient_id: id,
        vitals,
    }))
}

/// `POST /api/patients/:id/vitals`
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    payload: Result<Json<VitalsDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<VitalsRecord>), ApiError> {
    let id = parse_patient_id(&patient_id)?;
    let Json(draft) = payload?;
    validate_vitals(&draft)?;

    let conn = ctx.open_db()?;
    require_patient(&conn, &id)?;

    let record = VitalsRecord::from_draft(id, draft);
    db::insert_vitals(&conn, &record)?;
    Ok((StatusCode::CREATED, Json(record)))
}
