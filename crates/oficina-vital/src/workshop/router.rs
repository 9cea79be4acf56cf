use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::analytics::{ReportPeriod, WorkshopAnalytics};
use super::checklist::{Checklist, ChecklistId, StatusUpdate};
use super::domain::{
    ChecklistItem, DomainError, ItemStatus, Motorcycle, MotorcycleCategory, MotorcycleUpdate,
    Plate,
};
use super::query::ChecklistFilter;
use super::repository::{ChecklistRepository, RepositoryError, VehicleRepository};
use super::service::{WorkshopError, WorkshopService};
use super::template::adaptive_checklist;

/// Router exposing the workshop registry, checklists and reports over JSON.
pub fn workshop_router<R>(service: Arc<WorkshopService<R>>) -> Router
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/motorcycles",
            get(list_motorcycles_handler::<R>).post(register_motorcycle_handler::<R>),
        )
        .route(
            "/api/v1/motorcycles/search",
            get(search_motorcycles_handler::<R>),
        )
        .route(
            "/api/v1/motorcycles/:plate",
            get(motorcycle_handler::<R>)
                .put(update_motorcycle_handler::<R>)
                .delete(delete_motorcycle_handler::<R>),
        )
        .route(
            "/api/v1/motorcycles/:plate/checklists",
            get(motorcycle_history_handler::<R>),
        )
        .route(
            "/api/v1/checklists",
            get(list_checklists_handler::<R>).post(register_checklist_handler::<R>),
        )
        .route(
            "/api/v1/checklists/:id",
            get(checklist_handler::<R>).delete(delete_checklist_handler::<R>),
        )
        .route(
            "/api/v1/checklists/:id/status",
            put(update_status_handler::<R>),
        )
        .route(
            "/api/v1/checklists/:id/items",
            post(add_item_handler::<R>),
        )
        .route(
            "/api/v1/checklists/:id/items/:index",
            put(update_item_handler::<R>),
        )
        .route("/api/v1/analytics", get(analytics_handler::<R>))
        .route(
            "/api/v1/analytics/categories",
            get(category_analytics_handler::<R>),
        )
        .route("/api/v1/finance", get(finance_handler::<R>))
        .with_state(service)
}

type SharedService<R> = State<Arc<WorkshopService<R>>>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotorcycleRequest {
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub displacement_cc: i32,
    #[serde(default)]
    pub category: Option<String>,
}

impl MotorcycleRequest {
    fn into_motorcycle(self) -> Result<Motorcycle, DomainError> {
        let category = match self.category.as_deref() {
            Some(raw) => raw.parse::<MotorcycleCategory>()?,
            None => MotorcycleCategory::default(),
        };
        Motorcycle::new(
            &self.plate,
            &self.brand,
            &self.model,
            self.year,
            self.displacement_cc,
            category,
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemRequest {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estimated_cost: f64,
}

impl ItemRequest {
    fn into_item(self) -> Result<ChecklistItem, DomainError> {
        let status = parse_status(self.status.as_deref())?.unwrap_or(ItemStatus::Pending);
        ChecklistItem::new(&self.name, &self.category, status, self.estimated_cost)
    }
}

/// New checklist for a registered vehicle. Without `items` the adaptive template for
/// `mileage` is used. `vehicle` registers the motorcycle on the way in when the plate is unknown.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChecklistRequest {
    pub plate: String,
    pub mileage: i64,
    #[serde(default)]
    pub revision_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Option<Vec<ItemRequest>>,
    #[serde(default)]
    pub vehicle: Option<MotorcycleRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemUpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    model: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AnalyticsQuery {
    plate: Option<Plate>,
    category: Option<MotorcycleCategory>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    future_mileage: Option<u64>,
}

impl AnalyticsQuery {
    fn filter(&self) -> ChecklistFilter {
        ChecklistFilter {
            plate: self.plate.clone(),
            category: self.category,
            ..ChecklistFilter::between(self.from, self.to)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FinanceQuery {
    period: Option<String>,
    reference: Option<NaiveDate>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ChecklistResponse<'a> {
    #[serde(flatten)]
    checklist: &'a Checklist,
    estimated_total_cost: f64,
}

fn checklist_response(status: StatusCode, checklist: &Checklist) -> Response {
    let body = ChecklistResponse {
        checklist,
        estimated_total_cost: checklist.estimated_total_cost(),
    };
    (status, Json(body)).into_response()
}

fn checklists_response(checklists: &[Checklist]) -> Response {
    let body: Vec<ChecklistResponse<'_>> = checklists
        .iter()
        .map(|checklist| ChecklistResponse {
            checklist,
            estimated_total_cost: checklist.estimated_total_cost(),
        })
        .collect();
    (StatusCode::OK, Json(body)).into_response()
}

fn parse_status(raw: Option<&str>) -> Result<Option<ItemStatus>, DomainError> {
    raw.map(str::parse::<ItemStatus>).transpose()
}

fn error_response(error: WorkshopError) -> Response {
    let status = match &error {
        WorkshopError::VehicleNotFound(_)
        | WorkshopError::ChecklistNotFound(_)
        | WorkshopError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        WorkshopError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        WorkshopError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WorkshopError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        WorkshopError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn invalid(error: DomainError) -> Response {
    error_response(WorkshopError::InvalidArgument(error))
}

pub(crate) async fn list_motorcycles_handler<R>(State(service): SharedService<R>) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    match service.vehicles() {
        Ok(vehicles) => (StatusCode::OK, Json(vehicles)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_motorcycle_handler<R>(
    State(service): SharedService<R>,
    Json(request): Json<MotorcycleRequest>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let vehicle = match request.into_motorcycle() {
        Ok(vehicle) => vehicle,
        Err(error) => return invalid(error),
    };
    match service.register_vehicle(vehicle) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn search_motorcycles_handler<R>(
    State(service): SharedService<R>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    match service.search_vehicles(&query.model) {
        Ok(vehicles) => (StatusCode::OK, Json(vehicles)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn motorcycle_handler<R>(
    State(service): SharedService<R>,
    Path(plate): Path<String>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let plate = match Plate::parse(&plate) {
        Ok(plate) => plate,
        Err(error) => return invalid(error),
    };
    match service.vehicle(&plate) {
        Ok(vehicle) => (StatusCode::OK, Json(vehicle)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_motorcycle_handler<R>(
    State(service): SharedService<R>,
    Path(plate): Path<String>,
    Json(update): Json<MotorcycleUpdate>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let plate = match Plate::parse(&plate) {
        Ok(plate) => plate,
        Err(error) => return invalid(error),
    };
    match service.update_vehicle(&plate, &update) {
        Ok(vehicle) => (StatusCode::OK, Json(vehicle)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_motorcycle_handler<R>(
    State(service): SharedService<R>,
    Path(plate): Path<String>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let plate = match Plate::parse(&plate) {
        Ok(plate) => plate,
        Err(error) => return invalid(error),
    };
    match service.delete_vehicle(&plate) {
        Ok(removed) => {
            let payload = json!({
                "plate": plate,
                "deleted_checklists": removed,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn motorcycle_history_handler<R>(
    State(service): SharedService<R>,
    Path(plate): Path<String>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let plate = match Plate::parse(&plate) {
        Ok(plate) => plate,
        Err(error) => return invalid(error),
    };
    let history = service
        .vehicle(&plate)
        .and_then(|_| service.vehicle_history(&plate));
    match history {
        Ok(checklists) => checklists_response(&checklists),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_checklists_handler<R>(
    State(service): SharedService<R>,
    Query(filter): Query<ChecklistFilter>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    match service.checklists(&filter) {
        Ok(checklists) => checklists_response(&checklists),
        Err(error) => error_response(error),
    }
}

fn build_checklist<R>(
    service: &WorkshopService<R>,
    request: ChecklistRequest,
) -> Result<Checklist, WorkshopError>
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let plate = Plate::parse(&request.plate)?;
    let vehicle = match (service.find_vehicle(&plate)?, request.vehicle) {
        (Some(vehicle), _) => vehicle,
        (None, Some(details)) => {
            let vehicle = details.into_motorcycle()?;
            if vehicle.plate() != &plate {
                return Err(DomainError::InvalidPlate {
                    plate: request.plate,
                    reason: "does not match the vehicle details",
                }
                .into());
            }
            vehicle
        }
        (None, None) => return Err(WorkshopError::VehicleNotFound(plate)),
    };

    match request.items {
        None => Ok(adaptive_checklist(
            vehicle,
            request.mileage,
            request.revision_date,
        )?),
        Some(items) => {
            let mut checklist = Checklist::new(vehicle, request.mileage, request.revision_date)?;
            for item in items {
                checklist.add_item(item.into_item()?);
            }
            Ok(checklist)
        }
    }
}

pub(crate) async fn register_checklist_handler<R>(
    State(service): SharedService<R>,
    Json(request): Json<ChecklistRequest>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let registration = build_checklist(&service, request)
        .and_then(|checklist| service.register_checklist(checklist));
    match registration {
        Ok(registration) => (StatusCode::CREATED, Json(registration)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn checklist_handler<R>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    match service.checklist(ChecklistId(id)) {
        Ok(checklist) => checklist_response(StatusCode::OK, &checklist),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_checklist_handler<R>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    match service.delete_checklist(ChecklistId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<R>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
    Json(update): Json<StatusUpdate>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    match service.update_status(ChecklistId(id), &update) {
        Ok(checklist) => checklist_response(StatusCode::OK, &checklist),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_item_handler<R>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
    Json(request): Json<ItemRequest>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let updated = request
        .into_item()
        .map_err(WorkshopError::from)
        .and_then(|item| service.add_item(ChecklistId(id), item));
    match updated {
        Ok(checklist) => checklist_response(StatusCode::CREATED, &checklist),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_item_handler<R>(
    State(service): SharedService<R>,
    Path((id, index)): Path<(u64, usize)>,
    Json(request): Json<ItemUpdateRequest>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let updated = parse_status(request.status.as_deref())
        .map_err(WorkshopError::from)
        .and_then(|status| {
            service.update_item(ChecklistId(id), index, status, request.estimated_cost)
        });
    match updated {
        Ok(checklist) => checklist_response(StatusCode::OK, &checklist),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analytics_handler<R>(
    State(service): SharedService<R>,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    match service.checklists(&query.filter()) {
        Ok(checklists) => {
            let overview = WorkshopAnalytics::new(&checklists).overview(query.future_mileage);
            (StatusCode::OK, Json(overview)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn category_analytics_handler<R>(
    State(service): SharedService<R>,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let snapshot = service
        .checklists(&query.filter())
        .and_then(|checklists| Ok((checklists, service.vehicles()?)));
    match snapshot {
        Ok((checklists, vehicles)) => {
            let breakdown = WorkshopAnalytics::new(&checklists).category_breakdown(&vehicles);
            (StatusCode::OK, Json(breakdown)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finance_handler<R>(
    State(service): SharedService<R>,
    Query(query): Query<FinanceQuery>,
) -> Response
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    let period = match query.period.as_deref().map(str::parse::<ReportPeriod>).transpose() {
        Ok(period) => period,
        Err(error) => return invalid(error),
    };

    let checklists = match service.checklists(&ChecklistFilter::default()) {
        Ok(checklists) => checklists,
        Err(error) => return error_response(error),
    };
    let analytics = WorkshopAnalytics::new(&checklists);
    let report = match period {
        Some(period) => analytics.financial_report_for_period(period, query.reference),
        None => analytics.financial_report(query.from, query.to),
    };
    (StatusCode::OK, Json(report)).into_response()
}
