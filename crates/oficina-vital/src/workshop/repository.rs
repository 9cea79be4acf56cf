use super::checklist::{Checklist, ChecklistId};
use super::domain::{Motorcycle, Plate};
use super::query::ChecklistFilter;

/// Vehicle storage. Plates are already normalized when they reach the repository.
pub trait VehicleRepository: Send + Sync {
    /// Store a new vehicle; `Conflict` when the plate is taken.
    fn insert_vehicle(&self, vehicle: Motorcycle) -> Result<Motorcycle, RepositoryError>;
    /// Replace a stored vehicle and refresh the snapshot held by its checklists.
    fn update_vehicle(&self, vehicle: Motorcycle) -> Result<(), RepositoryError>;
    fn fetch_vehicle(&self, plate: &Plate) -> Result<Option<Motorcycle>, RepositoryError>;
    fn list_vehicles(&self) -> Result<Vec<Motorcycle>, RepositoryError>;
    /// Case-insensitive substring match on the model name.
    fn search_vehicles(&self, model_fragment: &str) -> Result<Vec<Motorcycle>, RepositoryError>;
    /// Remove a vehicle together with its checklists, returning how many checklists went with it.
    fn remove_vehicle(&self, plate: &Plate) -> Result<usize, RepositoryError>;
}

/// Checklist storage.
pub trait ChecklistRepository: Send + Sync {
    /// Store a new checklist and assign its identifier.
    fn insert_checklist(&self, checklist: Checklist) -> Result<Checklist, RepositoryError>;
    fn update_checklist(&self, checklist: Checklist) -> Result<(), RepositoryError>;
    fn fetch_checklist(&self, id: ChecklistId) -> Result<Option<Checklist>, RepositoryError>;
    /// Checklists matching `filter`, ordered and paginated as the filter requests.
    fn list_checklists(&self, filter: &ChecklistFilter) -> Result<Vec<Checklist>, RepositoryError>;
    /// Most recent checklist of a vehicle by revision date, ties broken by identifier.
    fn latest_checklist(&self, plate: &Plate) -> Result<Option<Checklist>, RepositoryError>;
    fn remove_checklist(&self, id: ChecklistId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
