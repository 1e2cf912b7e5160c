//! API router.
//!
//! Returns a composable `Router` with every endpoint nested under `/api/`.
//! Layers (outermost → innermost): CORS → access log → handler.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router for the given context.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/dashboard", get(endpoints::dashboard::summary))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail)
                .put(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/patients/:id/vitals",
            get(endpoints::vitals::list).post(endpoints::vitals::create),
        )
        .route(
            "/patients/:id/medications",
            get(endpoints::medications::list).post(endpoints::medications::create),
        )
        .route("/patients/:id/risk", get(endpoints::risk::assess))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(axum::middleware::from_fn(middleware::access::log_access))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router() -> (Router, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(tmp.path().join("halo.db"));
        (api_router(ctx), tmp)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn scenario_intake() -> Value {
        json!({
            "name": "Robert Keller",
            "age": 76,
            "gender": "male",
            "weight_kg": 89.59,
            "height_cm": 170.0,
            "frailty_score": 3,
            "conditions": ["Hypertension"],
            "diabetes_type": "type2",
            "vitals": {
                "blood_pressure": "165/95 mmHg",
                "hba1c": 8.5,
                "glucose": 142.0,
                "creatinine": 1.26
            },
            "medications": [
                { "drug_name": "Metformin", "dosage": "1000 mg", "frequency": "twice daily" },
                { "drug_name": "Lisinopril", "dosage": "20 mg" }
            ]
        })
    }

    async fn create_scenario(router: &Router) -> String {
        let (status, body) = send(router, "POST", "/api/patients", Some(scenario_intake())).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["patient"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (router, _tmp) = test_router();
        let (status, body) = send(&router, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], crate::config::APP_VERSION);
        assert_eq!(body["patients"], 0);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let (router, _tmp) = test_router();
        let (status, _) = send(&router, "GET", "/api/nonexistent", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_returns_full_record() {
        let (router, _tmp) = test_router();
        let (status, body) = send(&router, "POST", "/api/patients", Some(scenario_intake())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["patient"]["mrn"].as_str().unwrap().starts_with("MRN"));
        assert_eq!(body["latest_vitals"]["blood_pressure"], "165/95 mmHg");
        assert_eq!(body["medications"].as_array().unwrap().len(), 2);
        assert_eq!(body["derived"]["bmi"], 31.0);
        assert_eq!(body["derived"]["egfr"], 55.04);
    }

    #[tokio::test]
    async fn invalid_intake_reports_every_field() {
        let (router, _tmp) = test_router();
        let mut intake = scenario_intake();
        intake["age"] = json!(45);
        intake["vitals"]["blood_pressure"] = json!("high");
        intake["medications"][1]["drug_name"] = json!("  ");

        let (status, body) = send(&router, "POST", "/api/patients", Some(intake)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        let details = body["error"]["details"].as_array().unwrap();
        assert_eq!(details.len(), 3);
        assert!(details[1].as_str().unwrap().starts_with("Vitals: "));
        assert!(details[2].as_str().unwrap().starts_with("Medication 2: "));

        let (_, list) = send(&router, "GET", "/api/patients", None).await;
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (router, _tmp) = test_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/patients")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn risk_for_scenario_patient() {
        let (router, _tmp) = test_router();
        let id = create_scenario(&router).await;

        let (status, body) = send(&router, "GET", &format!("/api/patients/{id}/risk"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patient_id"], id.as_str());
        assert_eq!(body["overall_level"], "high");

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0]["category"], "cardiovascular_risk");
        assert_eq!(results[0]["score"], 85);
        assert_eq!(results[0]["level"], "high");
        assert_eq!(results[2]["category"], "blood_pressure_control_risk");
        assert_eq!(results[2]["score"], 80);

        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r["priority"] == "high"));
    }

    #[tokio::test]
    async fn risk_without_vitals_is_422() {
        let (router, _tmp) = test_router();
        let mut intake = scenario_intake();
        intake.as_object_mut().unwrap().remove("vitals");
        let (_, created) = send(&router, "POST", "/api/patients", Some(intake)).await;
        let id = created["patient"]["id"].as_str().unwrap();

        let (status, body) = send(&router, "GET", &format!("/api/patients/{id}/risk"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "MISSING_VITALS");
    }

    #[tokio::test]
    async fn unknown_patient_is_404_and_bad_id_is_400() {
        let (router, _tmp) = test_router();
        let unknown = uuid::Uuid::new_v4();
        let (status, _) = send(&router, "GET", &format!("/api/patients/{unknown}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, "GET", &format!("/api/patients/{unknown}/risk"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&router, "GET", "/api/patients/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn new_vitals_change_the_assessment() {
        let (router, _tmp) = test_router();
        let id = create_scenario(&router).await;

        // Latest reading wins on equal timestamps, so no sleep is needed.
        let (status, _) = send(
            &router,
            "POST",
            &format!("/api/patients/{id}/vitals"),
            Some(json!({ "blood_pressure": "128/78 mmHg", "hba1c": 7.2, "creatinine": 0.9 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, history) = send(&router, "GET", &format!("/api/patients/{id}/vitals"), None).await;
        let vitals = history["vitals"].as_array().unwrap();
        assert_eq!(vitals.len(), 2);
        assert_eq!(vitals[0]["blood_pressure"], "128/78 mmHg");

        let (_, body) = send(&router, "GET", &format!("/api/patients/{id}/risk"), None).await;
        let bp = &body["results"][2];
        assert_eq!(bp["score"], 0);
        assert_eq!(bp["level"], "low");
    }

    #[tokio::test]
    async fn invalid_vitals_rejected() {
        let (router, _tmp) = test_router();
        let id = create_scenario(&router).await;
        let (status, body) = send(
            &router,
            "POST",
            &format!("/api/patients/{id}/vitals"),
            Some(json!({ "hba1c": 35.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn medications_can_be_added_and_listed() {
        let (router, _tmp) = test_router();
        let id = create_scenario(&router).await;

        let (status, med) = send(
            &router,
            "POST",
            &format!("/api/patients/{id}/medications"),
            Some(json!({ "drug_name": "Atorvastatin", "dosage": "40 mg" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(med["drug_name"], "Atorvastatin");

        let (_, list) = send(&router, "GET", &format!("/api/patients/{id}/medications"), None).await;
        assert_eq!(list["total"], 3);
        assert_eq!(list["medications"][2]["drug_name"], "Atorvastatin");
    }

    #[tokio::test]
    async fn duplicate_mrn_is_conflict() {
        let (router, _tmp) = test_router();
        let mut intake = scenario_intake();
        intake["mrn"] = json!("MRN123456");

        let (status, _) = send(&router, "POST", "/api/patients", Some(intake.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(&router, "POST", "/api/patients", Some(intake)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        // The rejected intake must not leave a partial patient behind.
        let (_, list) = send(&router, "GET", "/api/patients", None).await;
        assert_eq!(list["total"], 1);

        let other = create_scenario(&router).await;
        let (status, body) = send(
            &router,
            "PUT",
            &format!("/api/patients/{other}"),
            Some(json!({
                "name": "Robert Keller",
                "mrn": "MRN123456",
                "age": 76,
                "gender": "male"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn created_record_matches_what_is_read_back() {
        let (router, _tmp) = test_router();
        let (_, created) = send(&router, "POST", "/api/patients", Some(scenario_intake())).await;
        let id = created["patient"]["id"].as_str().unwrap();

        let (status, detail) = send(&router, "GET", &format!("/api/patients/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["patient"]["created_at"], created["patient"]["created_at"]);
        assert_eq!(detail["patient"]["updated_at"], created["patient"]["updated_at"]);
        assert_eq!(
            detail["latest_vitals"]["recorded_at"],
            created["latest_vitals"]["recorded_at"]
        );
        assert_eq!(detail["medications"], created["medications"]);
    }

    #[tokio::test]
    async fn update_then_delete() {
        let (router, _tmp) = test_router();
        let id = create_scenario(&router).await;

        let (status, updated) = send(
            &router,
            "PUT",
            &format!("/api/patients/{id}"),
            Some(json!({
                "name": "Robert Keller",
                "age": 77,
                "gender": "male",
                "frailty_score": 4,
                "conditions": ["Hypertension", "CKD"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["age"], 77);
        assert_eq!(updated["conditions"].as_array().unwrap().len(), 2);

        let (status, _) = send(&router, "DELETE", &format!("/api/patients/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&router, "GET", &format!("/api/patients/{id}/vitals"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&router, "DELETE", &format!("/api/patients/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_is_paginated() {
        let (router, _tmp) = test_router();
        for name in ["Ann Alpha", "Ben Beta", "Cora Gamma"] {
            let mut intake = scenario_intake();
            intake["name"] = json!(name);
            let (status, _) = send(&router, "POST", "/api/patients", Some(intake)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&router, "GET", "/api/patients?offset=1&limit=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["offset"], 1);
        assert_eq!(body["limit"], 1);
        assert_eq!(body["patients"][0]["name"], "Ben Beta");

        let (status, _) = send(&router, "GET", "/api/patients?limit=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_counts_cohort() {
        let (router, _tmp) = test_router();
        create_scenario(&router).await;

        let (status, body) = send(&router, "GET", "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_patients"], 1);
        let metrics = body["metrics"].as_array().unwrap();
        assert_eq!(metrics.len(), 4);
        // Age 76 and type 2 diabetes: two cardiovascular factors.
        assert_eq!(metrics[0]["label"], "Cardiovascular Events");
        assert_eq!(metrics[0]["percentage"], 100);
        assert_eq!(metrics[0]["level"], "high");
        // Systolic 165.
        assert_eq!(metrics[2]["patients"], 1);
        // Two medications.
        assert_eq!(metrics[3]["patients"], 0);
    }
}
