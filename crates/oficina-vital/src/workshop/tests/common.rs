use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workshop::checklist::{Checklist, ChecklistId};
use crate::workshop::domain::{ChecklistItem, ItemStatus, Motorcycle, MotorcycleCategory, Plate};
use crate::workshop::memory::InMemoryRegistry;
use crate::workshop::query::ChecklistFilter;
use crate::workshop::repository::{ChecklistRepository, RepositoryError, VehicleRepository};
use crate::workshop::service::WorkshopService;
use crate::workshop::validation::ValidationPolicy;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn bike(plate: &str, model: &str, category: MotorcycleCategory) -> Motorcycle {
    Motorcycle::new(plate, "Honda", model, 2022, 300, category).expect("valid motorcycle")
}

pub(super) fn titan() -> Motorcycle {
    bike("ABC1D23", "CG 160 Titan", MotorcycleCategory::Street)
}

/// Checklist with one billable item per cost in `replacements`.
pub(super) fn checklist_with(
    vehicle: &Motorcycle,
    mileage: i64,
    revision_date: NaiveDate,
    replacements: &[f64],
) -> Checklist {
    let mut checklist =
        Checklist::new(vehicle.clone(), mileage, Some(revision_date)).expect("valid checklist");
    for (index, cost) in replacements.iter().enumerate() {
        checklist.add_item(
            ChecklistItem::new(
                &format!("Peça {index}"),
                "Engine",
                ItemStatus::NeedsReplacement,
                *cost,
            )
            .expect("valid item"),
        );
    }
    checklist
}

pub(super) fn build_service() -> (WorkshopService<InMemoryRegistry>, Arc<InMemoryRegistry>) {
    let registry = Arc::new(InMemoryRegistry::new());
    let service = WorkshopService::new(registry.clone(), ValidationPolicy::default());
    (service, registry)
}

pub(super) struct UnavailableRepository;

impl VehicleRepository for UnavailableRepository {
    fn insert_vehicle(&self, _vehicle: Motorcycle) -> Result<Motorcycle, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_vehicle(&self, _vehicle: Motorcycle) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_vehicle(&self, _plate: &Plate) -> Result<Option<Motorcycle>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_vehicles(&self) -> Result<Vec<Motorcycle>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn search_vehicles(&self, _model_fragment: &str) -> Result<Vec<Motorcycle>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove_vehicle(&self, _plate: &Plate) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl ChecklistRepository for UnavailableRepository {
    fn insert_checklist(&self, _checklist: Checklist) -> Result<Checklist, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_checklist(&self, _checklist: Checklist) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_checklist(&self, _id: ChecklistId) -> Result<Option<Checklist>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_checklists(&self, _filter: &ChecklistFilter) -> Result<Vec<Checklist>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_checklist(&self, _plate: &Plate) -> Result<Option<Checklist>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove_checklist(&self, _id: ChecklistId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
