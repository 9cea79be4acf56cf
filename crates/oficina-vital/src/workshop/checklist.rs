use super::domain::{validate_cost, ChecklistItem, DomainError, ItemStatus, Motorcycle};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a checklist when it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistId(pub u64);

impl fmt::Display for ChecklistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One maintenance inspection of a motorcycle at a given mileage and date.
///
/// The checklist carries a snapshot of the motorcycle it belongs to; the registry
/// refreshes that snapshot whenever the motorcycle record changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checklist {
    id: Option<ChecklistId>,
    vehicle: Motorcycle,
    mileage: u64,
    revision_date: NaiveDate,
    items: Vec<ChecklistItem>,
    finalized: bool,
    paid: bool,
    real_cost: Option<f64>,
}

impl Checklist {
    /// Start an empty checklist; `revision_date` defaults to today.
    pub fn new(
        vehicle: Motorcycle,
        mileage: i64,
        revision_date: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        let mileage = u64::try_from(mileage).map_err(|_| DomainError::NegativeMileage(mileage))?;

        Ok(Self {
            id: None,
            vehicle,
            mileage,
            revision_date: revision_date.unwrap_or_else(|| Local::now().date_naive()),
            items: Vec::new(),
            finalized: false,
            paid: false,
            real_cost: None,
        })
    }

    pub fn id(&self) -> Option<ChecklistId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: ChecklistId) {
        self.id = Some(id);
    }

    pub fn vehicle(&self) -> &Motorcycle {
        &self.vehicle
    }

    pub(crate) fn refresh_vehicle(&mut self, vehicle: Motorcycle) {
        self.vehicle = vehicle;
    }

    pub fn mileage(&self) -> u64 {
        self.mileage
    }

    pub fn revision_date(&self) -> NaiveDate {
        self.revision_date
    }

    /// Revision date rendered as `dd/mm/yyyy`.
    pub fn formatted_date(&self) -> String {
        self.revision_date.format("%d/%m/%Y").to_string()
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Owned copy of the items; edits to it never reach the checklist.
    pub fn items_snapshot(&self) -> Vec<ChecklistItem> {
        self.items.clone()
    }

    pub fn add_item(&mut self, item: ChecklistItem) {
        self.items.push(item);
    }

    /// Update the item at `index`. Both inputs are validated before anything changes.
    pub fn update_item(
        &mut self,
        index: usize,
        status: Option<ItemStatus>,
        estimated_cost: Option<f64>,
    ) -> Result<&ChecklistItem, DomainError> {
        if let Some(cost) = estimated_cost {
            validate_cost(cost)?;
        }

        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(DomainError::ItemIndexOutOfBounds { index, len })?;

        if let Some(status) = status {
            item.set_status(status);
        }
        if let Some(cost) = estimated_cost {
            item.set_estimated_cost(cost)?;
        }

        Ok(item)
    }

    pub fn count_by_status(&self, status: ItemStatus) -> usize {
        self.items
            .iter()
            .filter(|item| item.status() == status)
            .count()
    }

    pub fn completed_count(&self) -> usize {
        self.count_by_status(ItemStatus::Completed)
    }

    pub fn pending_count(&self) -> usize {
        self.count_by_status(ItemStatus::Pending)
    }

    pub fn needs_replacement_count(&self) -> usize {
        self.count_by_status(ItemStatus::NeedsReplacement)
    }

    pub fn ignored_count(&self) -> usize {
        self.count_by_status(ItemStatus::Ignored)
    }

    /// Sum of estimated costs over items that need replacement.
    pub fn estimated_total_cost(&self) -> f64 {
        self.items.iter().map(ChecklistItem::billable_cost).sum()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn set_finalized(&mut self, finalized: bool) {
        self.finalized = finalized;
    }

    pub fn is_paid(&self) -> bool {
        self.paid
    }

    pub fn set_paid(&mut self, paid: bool) {
        self.paid = paid;
    }

    pub fn real_cost(&self) -> Option<f64> {
        self.real_cost
    }

    pub fn set_real_cost(&mut self, real_cost: f64) -> Result<(), DomainError> {
        if real_cost.is_nan() || real_cost < 0.0 {
            return Err(DomainError::NegativeRealCost(real_cost));
        }
        self.real_cost = Some(real_cost);
        Ok(())
    }

    /// Apply a finalized/paid/real-cost update, validating the cost first.
    pub fn apply_status(&mut self, update: &StatusUpdate) -> Result<(), DomainError> {
        if let Some(real_cost) = update.real_cost {
            self.set_real_cost(real_cost)?;
        }
        if let Some(finalized) = update.finalized {
            self.finalized = finalized;
        }
        if let Some(paid) = update.paid {
            self.paid = paid;
        }
        Ok(())
    }

    pub fn vehicle_label(&self) -> String {
        self.vehicle.label()
    }
}

/// Partial update of the finalization and payment fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub finalized: Option<bool>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default)]
    pub real_cost: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workshop::domain::MotorcycleCategory;

    fn bike() -> Motorcycle {
        Motorcycle::new("ABC1D23", "Yamaha", "MT-07", 2021, 689, MotorcycleCategory::Street)
            .expect("valid motorcycle")
    }

    fn item(name: &str, status: ItemStatus, cost: f64) -> ChecklistItem {
        ChecklistItem::new(name, "Engine", status, cost).expect("valid item")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn estimated_total_counts_only_items_needing_replacement() {
        let mut checklist = Checklist::new(bike(), 15_000, Some(date(2025, 3, 10))).unwrap();
        checklist.add_item(item("Filtro de óleo", ItemStatus::NeedsReplacement, 100.0));
        checklist.add_item(item("Velas de ignição", ItemStatus::Pending, 50.0));
        checklist.add_item(item("Óleo do motor", ItemStatus::NeedsReplacement, 80.0));
        checklist.add_item(item("Filtro de ar", ItemStatus::Ignored, 35.0));
        checklist.add_item(item("Bateria", ItemStatus::Completed, 300.0));

        assert_eq!(checklist.estimated_total_cost(), 180.0);
        assert_eq!(checklist.needs_replacement_count(), 2);
        assert_eq!(checklist.pending_count(), 1);
        assert_eq!(checklist.ignored_count(), 1);
        assert_eq!(checklist.completed_count(), 1);
    }

    #[test]
    fn rejects_negative_mileage() {
        assert_eq!(
            Checklist::new(bike(), -1, None),
            Err(DomainError::NegativeMileage(-1))
        );
    }

    #[test]
    fn revision_date_defaults_to_today() {
        let checklist = Checklist::new(bike(), 0, None).unwrap();
        assert_eq!(checklist.revision_date(), Local::now().date_naive());
    }

    #[test]
    fn snapshot_edits_do_not_leak_into_checklist() {
        let mut checklist = Checklist::new(bike(), 1_000, None).unwrap();
        checklist.add_item(item("Corrente", ItemStatus::Pending, 0.0));

        let mut snapshot = checklist.items_snapshot();
        snapshot[0].set_status(ItemStatus::NeedsReplacement);
        snapshot[0].set_estimated_cost(250.0).unwrap();
        snapshot.clear();

        assert_eq!(checklist.items().len(), 1);
        assert_eq!(checklist.items()[0].status(), ItemStatus::Pending);
        assert_eq!(checklist.estimated_total_cost(), 0.0);
    }

    #[test]
    fn item_update_is_all_or_nothing() {
        let mut checklist = Checklist::new(bike(), 1_000, None).unwrap();
        checklist.add_item(item("Pneu traseiro", ItemStatus::Pending, 0.0));

        assert_eq!(
            checklist
                .update_item(0, Some(ItemStatus::NeedsReplacement), Some(-5.0))
                .unwrap_err(),
            DomainError::NegativeCost(-5.0)
        );
        assert_eq!(checklist.items()[0].status(), ItemStatus::Pending);

        assert_eq!(
            checklist
                .update_item(3, Some(ItemStatus::Completed), None)
                .unwrap_err(),
            DomainError::ItemIndexOutOfBounds { index: 3, len: 1 }
        );

        let updated = checklist
            .update_item(0, Some(ItemStatus::NeedsReplacement), Some(420.0))
            .expect("valid update");
        assert_eq!(updated.estimated_cost(), 420.0);
        assert_eq!(checklist.estimated_total_cost(), 420.0);
    }

    #[test]
    fn paid_and_finalized_are_independent() {
        let mut checklist = Checklist::new(bike(), 1_000, None).unwrap();
        checklist.set_paid(true);
        assert!(checklist.is_paid());
        assert!(!checklist.is_finalized());

        checklist.set_finalized(true);
        checklist.set_paid(false);
        assert!(checklist.is_finalized());
        assert!(!checklist.is_paid());
    }

    #[test]
    fn real_cost_rejects_negative_values() {
        let mut checklist = Checklist::new(bike(), 1_000, None).unwrap();
        let update = StatusUpdate {
            finalized: Some(true),
            paid: Some(true),
            real_cost: Some(-10.0),
        };
        let err = checklist.apply_status(&update).unwrap_err();
        assert_eq!(err, DomainError::NegativeRealCost(-10.0));
        assert!(err.to_string().starts_with("real cost cannot be negative"));
        assert!(!checklist.is_finalized());
        assert_eq!(checklist.real_cost(), None);

        checklist.set_real_cost(275.5).unwrap();
        assert_eq!(checklist.real_cost(), Some(275.5));
    }

    #[test]
    fn formats_revision_date_for_display() {
        let checklist = Checklist::new(bike(), 1_000, Some(date(2024, 2, 9))).unwrap();
        assert_eq!(checklist.formatted_date(), "09/02/2024");
        assert_eq!(checklist.vehicle_label(), "MT-07 (ABC1D23)");
    }
}
