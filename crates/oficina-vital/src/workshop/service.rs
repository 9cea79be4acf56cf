use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::checklist::{Checklist, ChecklistId, StatusUpdate};
use super::domain::{ChecklistItem, DomainError, ItemStatus, Motorcycle, MotorcycleUpdate, Plate};
use super::query::{ChecklistFilter, ChecklistOrdering};
use super::repository::{ChecklistRepository, RepositoryError, VehicleRepository};
use super::validation::{Advisory, ValidationFailure, ValidationPolicy};

/// Outcome of a successful checklist registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub id: ChecklistId,
    pub advisories: Vec<Advisory>,
}

/// Service composing the validation policy with vehicle and checklist storage.
pub struct WorkshopService<R> {
    repository: Arc<R>,
    policy: ValidationPolicy,
}

impl<R> WorkshopService<R>
where
    R: VehicleRepository + ChecklistRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: ValidationPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Register a vehicle. A plate that is already registered is a no-op returning the stored record.
    pub fn register_vehicle(&self, vehicle: Motorcycle) -> Result<Motorcycle, WorkshopError> {
        let plate = vehicle.plate().clone();
        match self.repository.insert_vehicle(vehicle) {
            Ok(stored) => {
                info!(plate = %plate, model = stored.model(), "vehicle registered");
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => {
                info!(plate = %plate, "vehicle already registered; keeping existing record");
                self.vehicle(&plate)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn update_vehicle(
        &self,
        plate: &Plate,
        update: &MotorcycleUpdate,
    ) -> Result<Motorcycle, WorkshopError> {
        let mut vehicle = self.vehicle(plate)?;
        vehicle.apply(update)?;
        self.repository.update_vehicle(vehicle.clone())?;
        info!(plate = %plate, "vehicle updated");
        Ok(vehicle)
    }

    pub fn find_vehicle(&self, plate: &Plate) -> Result<Option<Motorcycle>, WorkshopError> {
        Ok(self.repository.fetch_vehicle(plate)?)
    }

    /// Fetch a vehicle, treating absence as an error.
    pub fn vehicle(&self, plate: &Plate) -> Result<Motorcycle, WorkshopError> {
        self.repository
            .fetch_vehicle(plate)?
            .ok_or_else(|| WorkshopError::VehicleNotFound(plate.clone()))
    }

    pub fn vehicles(&self) -> Result<Vec<Motorcycle>, WorkshopError> {
        Ok(self.repository.list_vehicles()?)
    }

    pub fn search_vehicles(&self, model_fragment: &str) -> Result<Vec<Motorcycle>, WorkshopError> {
        Ok(self.repository.search_vehicles(model_fragment)?)
    }

    /// Delete a vehicle and every checklist recorded for it.
    pub fn delete_vehicle(&self, plate: &Plate) -> Result<usize, WorkshopError> {
        let removed = self.repository.remove_vehicle(plate).map_err(|err| match err {
            RepositoryError::NotFound => WorkshopError::VehicleNotFound(plate.clone()),
            other => other.into(),
        })?;
        info!(plate = %plate, checklists = removed, "vehicle deleted");
        Ok(removed)
    }

    /// Validate and store a checklist.
    ///
    /// Mileage is compared against the vehicle's latest checklist and the estimated total
    /// and item costs against the policy limits. Any failure rejects the checklist before
    /// anything is written; advisories are logged and returned. A vehicle that is not yet
    /// registered is registered on the way in.
    pub fn register_checklist(&self, checklist: Checklist) -> Result<Registration, WorkshopError> {
        let plate = checklist.vehicle().plate().clone();
        let previous = self
            .repository
            .latest_checklist(&plate)?
            .map(|latest| latest.mileage());

        let mileage = i64::try_from(checklist.mileage()).unwrap_or(i64::MAX);
        let mut advisories = Vec::new();
        advisories.extend(self.policy.check_mileage(mileage, previous)?);
        advisories.extend(
            self.policy
                .check_total_cost(checklist.estimated_total_cost())?,
        );
        for item in checklist.items() {
            if item.status().counts_toward_cost() {
                advisories.extend(self.policy.check_item_cost(item.name(), item.estimated_cost())?);
            }
        }

        if self.repository.fetch_vehicle(&plate)?.is_none() {
            info!(plate = %plate, "registering unknown vehicle from checklist");
            self.register_vehicle(checklist.vehicle().clone())?;
        }

        let stored = self.repository.insert_checklist(checklist)?;
        let id = stored.id().ok_or_else(|| RepositoryError::Unavailable(
            "registry did not assign a checklist id".to_string(),
        ))?;

        for advisory in &advisories {
            warn!(plate = %plate, checklist = %id, "{advisory}");
        }
        info!(
            plate = %plate,
            checklist = %id,
            mileage = stored.mileage(),
            items = stored.items().len(),
            "checklist registered"
        );

        Ok(Registration { id, advisories })
    }

    pub fn find_checklist(&self, id: ChecklistId) -> Result<Option<Checklist>, WorkshopError> {
        Ok(self.repository.fetch_checklist(id)?)
    }

    /// Fetch a checklist, treating absence as an error.
    pub fn checklist(&self, id: ChecklistId) -> Result<Checklist, WorkshopError> {
        self.repository
            .fetch_checklist(id)?
            .ok_or(WorkshopError::ChecklistNotFound(id))
    }

    pub fn checklists(&self, filter: &ChecklistFilter) -> Result<Vec<Checklist>, WorkshopError> {
        Ok(self.repository.list_checklists(filter)?)
    }

    /// Revision history of one vehicle, newest first.
    pub fn vehicle_history(&self, plate: &Plate) -> Result<Vec<Checklist>, WorkshopError> {
        let filter = ChecklistFilter {
            order_by: Some(ChecklistOrdering::Date),
            ..ChecklistFilter::for_vehicle(plate.clone())
        };
        self.checklists(&filter)
    }

    pub fn update_item(
        &self,
        id: ChecklistId,
        index: usize,
        status: Option<ItemStatus>,
        estimated_cost: Option<f64>,
    ) -> Result<Checklist, WorkshopError> {
        let mut checklist = self.checklist(id)?;
        let item = checklist.update_item(index, status, estimated_cost)?;
        self.log_item_cost(id, item);
        self.store(checklist)
    }

    pub fn add_item(&self, id: ChecklistId, item: ChecklistItem) -> Result<Checklist, WorkshopError> {
        let mut checklist = self.checklist(id)?;
        self.log_item_cost(id, &item);
        checklist.add_item(item);
        self.store(checklist)
    }

    /// Update the finalized/paid flags and the real cost. Fields left `None` are unchanged.
    pub fn update_status(
        &self,
        id: ChecklistId,
        update: &StatusUpdate,
    ) -> Result<Checklist, WorkshopError> {
        let mut checklist = self.checklist(id)?;
        checklist.apply_status(update)?;
        debug!(
            checklist = %id,
            finalized = checklist.is_finalized(),
            paid = checklist.is_paid(),
            "checklist status updated"
        );
        self.store(checklist)
    }

    pub fn delete_checklist(&self, id: ChecklistId) -> Result<(), WorkshopError> {
        self.repository.remove_checklist(id).map_err(|err| match err {
            RepositoryError::NotFound => WorkshopError::ChecklistNotFound(id),
            other => other.into(),
        })?;
        info!(checklist = %id, "checklist deleted");
        Ok(())
    }

    fn store(&self, checklist: Checklist) -> Result<Checklist, WorkshopError> {
        self.repository.update_checklist(checklist.clone())?;
        Ok(checklist)
    }

    fn log_item_cost(&self, id: ChecklistId, item: &ChecklistItem) {
        if !item.status().counts_toward_cost() {
            return;
        }
        if let Ok(Some(advisory)) = self.policy.check_item_cost(item.name(), item.estimated_cost()) {
            warn!(checklist = %id, "{advisory}");
        }
    }
}

/// Error raised by the workshop service.
#[derive(Debug, thiserror::Error)]
pub enum WorkshopError {
    #[error("motorcycle with plate {0} is not registered")]
    VehicleNotFound(Plate),
    #[error("checklist {0} not found")]
    ChecklistNotFound(ChecklistId),
    #[error(transparent)]
    InvalidArgument(#[from] DomainError),
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
