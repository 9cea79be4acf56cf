//! Motorcycle maintenance checklists: vehicles, inspections, validation and reporting.

pub mod analytics;
pub mod checklist;
pub mod domain;
pub mod import;
pub mod memory;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub mod template;
pub mod validation;

#[cfg(test)]
mod tests;

pub use analytics::{ReportPeriod, WorkshopAnalytics};
pub use checklist::{Checklist, ChecklistId, StatusUpdate};
pub use domain::{
    ChecklistItem, DomainError, ItemStatus, Motorcycle, MotorcycleCategory, MotorcycleUpdate,
    Plate,
};
pub use import::{parse_fleet, read_fleet_file, ImportError};
pub use memory::InMemoryRegistry;
pub use query::{ChecklistFilter, ChecklistOrdering};
pub use repository::{ChecklistRepository, RepositoryError, VehicleRepository};
pub use router::workshop_router;
pub use service::{Registration, WorkshopError, WorkshopService};
pub use template::{
    adaptive_checklist, items_for_mileage, standard_checklist, ItemTemplate, BASELINE_ITEMS,
};
pub use validation::{Advisory, ValidationFailure, ValidationPolicy};
