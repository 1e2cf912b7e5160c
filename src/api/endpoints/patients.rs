//! Patient endpoints.
//!
//! - `GET    /api/patients` - paginated list
//! - `POST   /api/patients` - intake of patient, optional vitals, medications
//! - `GET    /api/patients/:id` - record with latest vitals and derived metrics
//! - `PUT    /api/patients/:id` - replace demographics and history
//! - `DELETE /api/patients/:id` - remove with all vitals and medications

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::{parse_patient_id, require_patient};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Page, PageQuery};
use crate::db;
use crate::models::{
    validate_medication, validate_patient, validate_vitals, Medication, MedicationDraft, Patient,
    PatientDraft, VitalsDraft, VitalsRecord,
};
use crate::risk::DerivedMetrics;

#[derive(Serialize)]
pub struct PatientListResponse {
    pub patients: Vec<Patient>,
    pub total: u32,
    #[serde(flatten)]
    pub page: Page,
}

/// Intake payload: patient fields at the top level plus optional records.
#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    #[serde(flatten)]
    pub patient: PatientDraft,
    #[serde(default)]
    pub vitals: Option<VitalsDraft>,
    #[serde(default)]
    pub medications: Vec<MedicationDraft>,
}

#[derive(Serialize)]
pub struct PatientDetailResponse {
    pub patient: Patient,
    pub latest_vitals: Option<VitalsRecord>,
    pub medications: Vec<Medication>,
    pub derived: DerivedMetrics,
}

/// `GET /api/patients`: patients sorted by name.
pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<PatientListResponse>, ApiError> {
    let Query(query) = query?;
    let page = query.resolve();

    let conn = ctx.open_db()?;
    let patients = db::list_patients(&conn, page.offset, page.limit)?;
    let total = db::count_patients(&conn)?;

    Ok(Json(PatientListResponse {
        patients,
        total,
        page,
    }))
}

/// `POST /api/patients`: validate everything, then store it in one transaction.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<CreatePatientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientDetailResponse>), ApiError> {
    let Json(request) = payload?;
    validate_intake(&request)?;

    let patient = Patient::from_draft(request.patient);
    let vitals = request
        .vitals
        .map(|draft| VitalsRecord::from_draft(patient.id, draft));
    let medications: Vec<Medication> = request
        .medications
        .into_iter()
        .map(|draft| Medication::from_draft(patient.id, draft))
        .collect();

    let conn = ctx.open_db()?;
    db::create_patient_with_records(&conn, &patient, vitals.as_ref(), &medications)?;

    let derived = derive_for(&patient, vitals.as_ref());
    Ok((
        StatusCode::CREATED,
        Json(PatientDetailResponse {
            patient,
            latest_vitals: vitals,
            medications,
            derived,
        }),
    ))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientDetailResponse>, ApiError> {
    let id = parse_patient_id(&patient_id)?;
    let conn = ctx.open_db()?;

    let patient = require_patient(&conn, &id)?;
    let latest_vitals = db::get_latest_vitals(&conn, &id)?;
    let medications = db::list_medications_for_patient(&conn, &id)?;
    let derived = derive_for(&patient, latest_vitals.as_ref());

    Ok(Json(PatientDetailResponse {
        patient,
        latest_vitals,
        medications,
        derived,
    }))
}

/// `PUT /api/patients/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    payload: Result<Json<PatientDraft>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_patient_id(&patient_id)?;
    let Json(draft) = payload?;
    validate_patient(&draft)?;

    let conn = ctx.open_db()?;
    let patient = require_patient(&conn, &id)?.with_draft(draft);
    db::update_patient(&conn, &patient)?;

    Ok(Json(patient))
}

/// `DELETE /api/patients/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_patient_id(&patient_id)?;
    let conn = ctx.open_db()?;
    db::delete_patient(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collect violations from every part of the intake before rejecting it.
fn validate_intake(request: &CreatePatientRequest) -> Result<(), ApiError> {
    let mut messages = Vec::new();

    if let Err(e) = validate_patient(&request.patient) {
        messages.extend(e.0);
    }
    if let Some(vitals) = &request.vitals {
        if let Err(e) = validate_vitals(vitals) {
            messages.extend(e.0.into_iter().map(|m| format!("Vitals: {m}")));
        }
    }
    for (index, med) in request.medications.iter().enumerate() {
        if let Err(e) = validate_medication(med) {
            let n = index + 1;
            messages.extend(e.0.into_iter().map(|m| format!("Medication {n}: {m}")));
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(messages))
    }
}

/// BMI needs only the patient; eGFR also needs a creatinine reading.
fn derive_for(patient: &Patient, vitals: Option<&VitalsRecord>) -> DerivedMetrics {
    let vitals = vitals.map(VitalsRecord::snapshot).unwrap_or_default();
    DerivedMetrics::compute(&patient.snapshot(), &vitals)
}
