use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::checklist::{Checklist, ChecklistId};
use super::domain::{Motorcycle, Plate};
use super::query::ChecklistFilter;
use super::repository::{ChecklistRepository, RepositoryError, VehicleRepository};

#[derive(Debug, Default)]
struct RegistryState {
    vehicles: BTreeMap<Plate, Motorcycle>,
    checklists: BTreeMap<ChecklistId, Checklist>,
    by_vehicle: HashMap<Plate, BTreeSet<ChecklistId>>,
}

/// Process-local registry backing both repository traits.
#[derive(Debug)]
pub struct InMemoryRegistry {
    state: Mutex<RegistryState>,
    sequence: AtomicU64,
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            sequence: AtomicU64::new(1),
        }
    }
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().expect("registry mutex poisoned")
    }

    fn next_id(&self) -> ChecklistId {
        ChecklistId(self.sequence.fetch_add(1, Ordering::Relaxed))
    }
}

impl VehicleRepository for InMemoryRegistry {
    fn insert_vehicle(&self, vehicle: Motorcycle) -> Result<Motorcycle, RepositoryError> {
        let mut state = self.state();
        if state.vehicles.contains_key(vehicle.plate()) {
            return Err(RepositoryError::Conflict);
        }
        state
            .vehicles
            .insert(vehicle.plate().clone(), vehicle.clone());
        Ok(vehicle)
    }

    fn update_vehicle(&self, vehicle: Motorcycle) -> Result<(), RepositoryError> {
        let mut state = self.state();
        let RegistryState {
            vehicles,
            checklists,
            by_vehicle,
        } = &mut *state;

        let stored = vehicles
            .get_mut(vehicle.plate())
            .ok_or(RepositoryError::NotFound)?;
        *stored = vehicle.clone();

        for id in by_vehicle.get(vehicle.plate()).into_iter().flatten() {
            if let Some(checklist) = checklists.get_mut(id) {
                checklist.refresh_vehicle(vehicle.clone());
            }
        }
        Ok(())
    }

    fn fetch_vehicle(&self, plate: &Plate) -> Result<Option<Motorcycle>, RepositoryError> {
        Ok(self.state().vehicles.get(plate).cloned())
    }

    fn list_vehicles(&self) -> Result<Vec<Motorcycle>, RepositoryError> {
        Ok(self.state().vehicles.values().cloned().collect())
    }

    fn search_vehicles(&self, model_fragment: &str) -> Result<Vec<Motorcycle>, RepositoryError> {
        let needle = model_fragment.trim().to_lowercase();
        Ok(self
            .state()
            .vehicles
            .values()
            .filter(|vehicle| vehicle.model().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn remove_vehicle(&self, plate: &Plate) -> Result<usize, RepositoryError> {
        let mut state = self.state();
        if state.vehicles.remove(plate).is_none() {
            return Err(RepositoryError::NotFound);
        }

        let owned = state.by_vehicle.remove(plate).unwrap_or_default();
        for id in &owned {
            state.checklists.remove(id);
        }
        Ok(owned.len())
    }
}

impl ChecklistRepository for InMemoryRegistry {
    fn insert_checklist(&self, mut checklist: Checklist) -> Result<Checklist, RepositoryError> {
        let mut state = self.state();
        let plate = checklist.vehicle().plate().clone();
        let registered = state
            .vehicles
            .get(&plate)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        let id = self.next_id();
        checklist.assign_id(id);
        checklist.refresh_vehicle(registered);
        state.by_vehicle.entry(plate).or_default().insert(id);
        state.checklists.insert(id, checklist.clone());
        Ok(checklist)
    }

    fn update_checklist(&self, checklist: Checklist) -> Result<(), RepositoryError> {
        let id = checklist.id().ok_or(RepositoryError::NotFound)?;
        let mut state = self.state();
        let stored = state
            .checklists
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.vehicle().plate() != checklist.vehicle().plate() {
            return Err(RepositoryError::Conflict);
        }
        *stored = checklist;
        Ok(())
    }

    fn fetch_checklist(&self, id: ChecklistId) -> Result<Option<Checklist>, RepositoryError> {
        Ok(self.state().checklists.get(&id).cloned())
    }

    fn list_checklists(&self, filter: &ChecklistFilter) -> Result<Vec<Checklist>, RepositoryError> {
        let state = self.state();
        let matching: Vec<Checklist> = match &filter.plate {
            Some(plate) => state
                .by_vehicle
                .get(plate)
                .into_iter()
                .flatten()
                .filter_map(|id| state.checklists.get(id))
                .filter(|checklist| filter.matches(checklist))
                .cloned()
                .collect(),
            None => state
                .checklists
                .values()
                .filter(|checklist| filter.matches(checklist))
                .cloned()
                .collect(),
        };
        drop(state);
        Ok(filter.arrange(matching))
    }

    fn latest_checklist(&self, plate: &Plate) -> Result<Option<Checklist>, RepositoryError> {
        let state = self.state();
        let latest = state
            .by_vehicle
            .get(plate)
            .into_iter()
            .flatten()
            .filter_map(|id| state.checklists.get(id))
            .max_by_key(|checklist| (checklist.revision_date(), checklist.id()))
            .cloned();
        Ok(latest)
    }

    fn remove_checklist(&self, id: ChecklistId) -> Result<(), RepositoryError> {
        let mut state = self.state();
        let removed = state
            .checklists
            .remove(&id)
            .ok_or(RepositoryError::NotFound)?;
        let plate = removed.vehicle().plate();
        if let Some(ids) = state.by_vehicle.get_mut(plate) {
            ids.remove(&id);
            if ids.is_empty() {
                state.by_vehicle.remove(plate);
            }
        }
        Ok(())
    }
}
