use super::super::checklist::ChecklistId;
use super::super::domain::{MotorcycleCategory, Plate};
use super::finance::ReportPeriod;
use chrono::NaiveDate;
use serde::Serialize;

/// Sum/mean/max/min of estimated totals. All zero when there is nothing to summarize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostSummary {
    pub total: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ActualCostSummary {
    pub total: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Checklists with a real cost on record.
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    pub completed: usize,
    pub pending: usize,
    pub needs_replacement: usize,
    pub ignored: usize,
}

/// Least-squares line `cost = slope * mileage + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostModel {
    pub slope: f64,
    pub intercept: f64,
}

impl CostModel {
    pub fn predict(&self, mileage: f64) -> f64 {
        self.slope * mileage + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ChecklistId>,
    pub date: NaiveDate,
    pub formatted_date: String,
    pub plate: Plate,
    pub vehicle: String,
    pub mileage: u64,
    pub estimated_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_cost: Option<f64>,
    pub finalized: bool,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<ReportPeriod>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub vehicles: usize,
    pub services: usize,
    pub paid: usize,
    pub unpaid: usize,
    pub average_ticket: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdownEntry {
    pub category: MotorcycleCategory,
    pub category_label: &'static str,
    pub vehicles: usize,
    pub checklists: usize,
    pub costs: CostSummary,
}

/// Everything the analytics dashboard shows in one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsOverview {
    pub checklists: usize,
    pub costs: CostSummary,
    pub actual_costs: ActualCostSummary,
    pub status_distribution: StatusDistribution,
    pub cost_model: Option<CostModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future_mileage: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_cost: Option<f64>,
    pub history: Vec<HistoryPoint>,
}
