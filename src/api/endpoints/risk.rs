//! `GET /api/patients/:id/risk`: risk assessment from the latest vitals.

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::api::endpoints::{parse_patient_id, require_patient};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::risk::{self, RiskAssessment};

#[derive(Serialize)]
pub struct RiskResponse {
    pub patient_id: Uuid,
    /// When the vitals the assessment is based on were recorded.
    pub vitals_recorded_at: NaiveDateTime,
    #[serde(flatten)]
    pub assessment: RiskAssessment,
}

pub async fn assess(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<RiskResponse>, ApiError> {
    let id = parse_patient_id(&patient_id)?;
    let conn = ctx.open_db()?;

    let patient = require_patient(&conn, &id)?;
    let vitals = db::get_latest_vitals(&conn, &id)?.ok_or(ApiError::MissingVitals)?;

    let assessment = risk::assess(&patient.snapshot(), Some(&vitals.snapshot()))?;
    tracing::info!(
        patient_id = %id,
        overall = %assessment.overall_level,
        recommendations = assessment.recommendations.len(),
        "Risk assessed"
    );

    Ok(Json(RiskResponse {
        patient_id: id,
        vitals_recorded_at: vitals.recorded_at,
        assessment,
    }))
}
