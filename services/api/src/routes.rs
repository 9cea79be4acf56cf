use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use oficina_vital::error::AppError;
use oficina_vital::workshop::{
    parse_fleet, workshop_router, ChecklistRepository, Plate, VehicleRepository, WorkshopService,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct FleetImportRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct FleetImportResponse {
    pub(crate) imported: usize,
    pub(crate) plates: Vec<Plate>,
}

pub(crate) fn with_workshop_routes<R>(service: Arc<WorkshopService<R>>) -> axum::Router
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    workshop_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/fleet/import",
            axum::routing::post(fleet_import_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Register every motorcycle of a fleet CSV. Nothing is registered when any row is invalid.
pub(crate) async fn fleet_import_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<FleetImportRequest>,
) -> Result<Json<FleetImportResponse>, AppError> {
    let fleet = parse_fleet(Cursor::new(payload.csv.into_bytes()))?;

    let mut plates = Vec::with_capacity(fleet.len());
    for vehicle in fleet {
        let stored = state.workshop.register_vehicle(vehicle)?;
        plates.push(stored.plate().clone());
    }

    Ok(Json(FleetImportResponse {
        imported: plates.len(),
        plates,
    }))
}
