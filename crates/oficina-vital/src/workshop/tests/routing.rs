use super::common::*;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workshop::query::ChecklistFilter;
use crate::workshop::router::{self, workshop_router, ItemUpdateRequest};
use crate::workshop::service::WorkshopService;
use crate::workshop::validation::ValidationPolicy;

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn titan_payload() -> Value {
    json!({
        "plate": "abc-1d23",
        "brand": "Honda",
        "model": "CG 160 Titan",
        "year": 2022,
        "displacement_cc": 162,
        "category": "street"
    })
}

#[tokio::test]
async fn register_motorcycle_route_normalizes_plate() {
    let (service, _) = build_service();
    let router = workshop_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/motorcycles", &titan_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["plate"], "ABC1D23");
    assert_eq!(body["category"], "STREET");

    let response = router
        .oneshot(get("/api/v1/motorcycles/ABC-1D23"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_plate_is_a_bad_request() {
    let (service, _) = build_service();
    let router = workshop_router(Arc::new(service));

    let response = router
        .oneshot(get("/api/v1/motorcycles/AB1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("at least 6"));
}

#[tokio::test]
async fn checklist_route_uses_adaptive_template_and_returns_advisories() {
    let (service, _) = build_service();
    let router = workshop_router(Arc::new(service));

    let first = json!({
        "plate": "ABC1D23",
        "mileage": 5000,
        "revision_date": "2025-01-10",
        "vehicle": titan_payload(),
    });
    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/checklists", &first))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["advisories"], json!([]));

    let response = router
        .clone()
        .oneshot(get("/api/v1/checklists/1"))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 26);
    assert_eq!(body["estimated_total_cost"], 0.0);

    let second = json!({
        "plate": "ABC1D23",
        "mileage": 30000,
        "revision_date": "2025-03-10",
        "items": [
            {"name": "Pneu traseiro", "category": "Tires", "status": "NEEDS_REPLACEMENT", "estimated_cost": 450.0}
        ],
    });
    let response = router
        .oneshot(json_request("POST", "/api/v1/checklists", &second))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["advisories"][0]["kind"], "mileage_gap");
    assert_eq!(body["advisories"][0]["gap"], 25000);
}

#[tokio::test]
async fn checklist_route_rejects_unknown_vehicle_without_details() {
    let (service, _) = build_service();
    let router = workshop_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/checklists",
            &json!({"plate": "ABC1D23", "mileage": 1000}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mileage_regression_is_unprocessable() {
    let (service, _) = build_service();
    service
        .register_checklist(checklist_with(&titan(), 20_000, date(2025, 1, 10), &[]))
        .expect("first checklist");
    let router = workshop_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/checklists",
            &json!({"plate": "ABC1D23", "mileage": 19000, "items": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("19000"));
}

#[tokio::test]
async fn checklist_handler_returns_not_found_for_unknown_id() {
    let (service, _) = build_service();

    let response = router::checklist_handler(State(Arc::new(service)), Path(42)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_item_handler_rejects_unknown_status() {
    let (service, _) = build_service();
    let registration = service
        .register_checklist(checklist_with(&titan(), 1_000, date(2025, 1, 10), &[90.0]))
        .expect("registered");

    let response = router::update_item_handler(
        State(Arc::new(service)),
        Path((registration.id.0, 0)),
        axum::Json(ItemUpdateRequest {
            status: Some("broken".to_string()),
            estimated_cost: None,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_route_marks_checklist_paid() {
    let (service, _) = build_service();
    let registration = service
        .register_checklist(checklist_with(&titan(), 1_000, date(2025, 1, 10), &[90.0]))
        .expect("registered");
    let router = workshop_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/checklists/{}/status", registration.id),
            &json!({"finalized": true, "paid": true, "real_cost": 60.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["paid"], true);
    assert_eq!(body["real_cost"], 60.0);
}

#[tokio::test]
async fn list_handler_surfaces_repository_failures() {
    let service = Arc::new(WorkshopService::new(
        Arc::new(UnavailableRepository),
        ValidationPolicy::default(),
    ));

    let response = router::list_checklists_handler::<UnavailableRepository>(
        State(service),
        Query(ChecklistFilter::default()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn finance_route_reports_month_and_rejects_unknown_period() {
    let (service, _) = build_service();
    let registration = service
        .register_checklist(checklist_with(&titan(), 1_000, date(2025, 2, 10), &[300.0]))
        .expect("registered");
    service
        .update_status(
            registration.id,
            &crate::workshop::StatusUpdate {
                finalized: Some(true),
                paid: Some(true),
                real_cost: Some(120.0),
            },
        )
        .expect("status updated");
    let router = workshop_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(get("/api/v1/finance?period=month&reference=2025-02-20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["period"], "month");
    assert_eq!(body["start"], "2025-02-01");
    assert_eq!(body["end"], "2025-02-28");
    assert_eq!(body["revenue"], 300.0);
    assert_eq!(body["profit"], 180.0);

    let response = router
        .oneshot(get("/api/v1/finance?period=fortnight"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analytics_route_scopes_to_one_category() {
    let (service, _) = build_service();
    service
        .register_checklist(checklist_with(&titan(), 1_000, date(2025, 1, 10), &[200.0]))
        .expect("street checklist");
    let ninja = bike("KWS4F56", "Ninja 400", crate::workshop::MotorcycleCategory::Sport);
    service
        .register_checklist(checklist_with(&ninja, 2_000, date(2025, 1, 12), &[700.0]))
        .expect("sport checklist");
    let router = workshop_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(get("/api/v1/analytics?category=SPORT"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["checklists"], 1);
    assert_eq!(body["costs"]["total"], 700.0);

    let response = router
        .oneshot(get("/api/v1/checklists?category=STREET"))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["vehicle"]["plate"], "ABC1D23");
}
