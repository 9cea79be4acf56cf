use super::checklist::Checklist;
use super::domain::{DomainError, ItemStatus, MotorcycleCategory, Plate};
use chrono::NaiveDate;
use serde::Deserialize;
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort key for checklist listings. Every ordering is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistOrdering {
    Date,
    Mileage,
    Cost,
}

impl ChecklistOrdering {
    fn compare(self, a: &Checklist, b: &Checklist) -> Ordering {
        match self {
            Self::Date => b.revision_date().cmp(&a.revision_date()),
            Self::Mileage => b.mileage().cmp(&a.mileage()),
            Self::Cost => b.estimated_total_cost().total_cmp(&a.estimated_total_cost()),
        }
    }
}

impl FromStr for ChecklistOrdering {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "data" => Ok(Self::Date),
            "mileage" | "km" => Ok(Self::Mileage),
            "cost" | "custo" => Ok(Self::Cost),
            _ => Err(DomainError::UnknownOrdering(s.to_string())),
        }
    }
}

/// Criteria for listing checklists. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChecklistFilter {
    pub plate: Option<Plate>,
    pub category: Option<MotorcycleCategory>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub finalized: Option<bool>,
    pub paid: Option<bool>,
    /// Keep checklists holding at least one item in this status.
    pub item_status: Option<ItemStatus>,
    pub order_by: Option<ChecklistOrdering>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl ChecklistFilter {
    pub fn for_vehicle(plate: Plate) -> Self {
        Self {
            plate: Some(plate),
            ..Self::default()
        }
    }

    /// Inclusive date window; either bound may be open.
    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from,
            to,
            ..Self::default()
        }
    }

    pub fn matches(&self, checklist: &Checklist) -> bool {
        if let Some(plate) = &self.plate {
            if checklist.vehicle().plate() != plate {
                return false;
            }
        }
        if self
            .category
            .is_some_and(|category| checklist.vehicle().category() != category)
        {
            return false;
        }
        if self.from.is_some_and(|from| checklist.revision_date() < from) {
            return false;
        }
        if self.to.is_some_and(|to| checklist.revision_date() > to) {
            return false;
        }
        if self.finalized.is_some_and(|finalized| checklist.is_finalized() != finalized) {
            return false;
        }
        if self.paid.is_some_and(|paid| checklist.is_paid() != paid) {
            return false;
        }
        if let Some(status) = self.item_status {
            if checklist.count_by_status(status) == 0 {
                return false;
            }
        }
        true
    }

    /// Sort by identifier, then by the requested key, then skip/limit.
    pub fn arrange(&self, mut checklists: Vec<Checklist>) -> Vec<Checklist> {
        checklists.sort_by_key(Checklist::id);
        if let Some(ordering) = self.order_by {
            checklists.sort_by(|a, b| ordering.compare(a, b));
        }

        let limit = self.limit.unwrap_or(usize::MAX);
        checklists.into_iter().skip(self.skip).take(limit).collect()
    }
}
