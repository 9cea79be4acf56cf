//! Cost, status and financial reporting over a snapshot of checklists.
//!
//! Callers filter first (through [`ChecklistFilter`](super::query::ChecklistFilter) or
//! otherwise) and hand the resulting slice to [`WorkshopAnalytics`]; every report is
//! recomputed from that slice on each call.

mod finance;
mod summary;
pub mod views;

pub use finance::ReportPeriod;

use super::checklist::Checklist;
use super::domain::Motorcycle;
use chrono::{Local, NaiveDate};
use views::{
    ActualCostSummary, AnalyticsOverview, CategoryBreakdownEntry, CostModel, CostSummary,
    FinancialReport, HistoryPoint, StatusDistribution,
};

#[derive(Debug, Clone, Copy)]
pub struct WorkshopAnalytics<'a> {
    checklists: &'a [Checklist],
}

impl<'a> WorkshopAnalytics<'a> {
    pub fn new(checklists: &'a [Checklist]) -> Self {
        Self { checklists }
    }

    pub fn cost_summary(&self) -> CostSummary {
        summary::summarize(self.checklists.iter().map(Checklist::estimated_total_cost))
    }

    pub fn actual_cost_summary(&self) -> ActualCostSummary {
        summary::actual_costs(self.checklists)
    }

    pub fn status_distribution(&self) -> StatusDistribution {
        summary::status_distribution(self.checklists)
    }

    /// Linear fit of estimated total against mileage. `None` below two checklists or
    /// when every checklist sits at the same mileage: a rank-deficient fit yields no
    /// model rather than a minimum-norm line.
    pub fn cost_model(&self) -> Option<CostModel> {
        summary::fit_cost_model(self.checklists)
    }

    pub fn predict_cost(&self, mileage: u64) -> Option<f64> {
        self.cost_model().map(|model| model.predict(mileage as f64))
    }

    /// Chart records in ascending date order.
    pub fn history(&self) -> Vec<HistoryPoint> {
        summary::history(self.checklists)
    }

    /// Financial report over checklists dated within `[start, end]`; open bounds are unbounded.
    pub fn financial_report(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> FinancialReport {
        finance::financial_report(self.checklists, start, end, None)
    }

    /// Financial report for the calendar period containing `reference` (today when `None`).
    pub fn financial_report_for_period(
        &self,
        period: ReportPeriod,
        reference: Option<NaiveDate>,
    ) -> FinancialReport {
        let reference = reference.unwrap_or_else(|| Local::now().date_naive());
        let (start, end) = period.window(reference);
        finance::financial_report(self.checklists, Some(start), Some(end), Some(period))
    }

    pub fn category_breakdown(&self, vehicles: &[Motorcycle]) -> Vec<CategoryBreakdownEntry> {
        summary::category_breakdown(self.checklists, vehicles)
    }

    pub fn overview(&self, future_mileage: Option<u64>) -> AnalyticsOverview {
        let cost_model = self.cost_model();
        AnalyticsOverview {
            checklists: self.checklists.len(),
            costs: self.cost_summary(),
            actual_costs: self.actual_cost_summary(),
            status_distribution: self.status_distribution(),
            cost_model,
            future_mileage,
            predicted_cost: future_mileage
                .and_then(|mileage| cost_model.map(|model| model.predict(mileage as f64))),
            history: self.history(),
        }
    }
}
