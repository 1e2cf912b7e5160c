//! `GET /api/dashboard`: cohort-wide risk counters.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::risk::{summarize, CohortSummary};

pub async fn summary(State(ctx): State<ApiContext>) -> Result<Json<CohortSummary>, ApiError> {
    let conn = ctx.open_db()?;
    let rows = db::load_cohort_rows(&conn)?;
    Ok(Json(summarize(&rows)))
}
