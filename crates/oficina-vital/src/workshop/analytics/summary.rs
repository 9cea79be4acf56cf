use super::super::checklist::Checklist;
use super::super::domain::{ItemStatus, Motorcycle, MotorcycleCategory};
use super::views::{
    ActualCostSummary, CategoryBreakdownEntry, CostModel, CostSummary, HistoryPoint,
    StatusDistribution,
};

pub(super) fn summarize(values: impl IntoIterator<Item = f64>) -> CostSummary {
    let mut count = 0usize;
    let mut total = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for value in values {
        count += 1;
        total += value;
        max = max.max(value);
        min = min.min(value);
    }

    if count == 0 {
        return CostSummary::default();
    }
    CostSummary {
        total,
        mean: total / count as f64,
        max,
        min,
    }
}

pub(super) fn actual_costs(checklists: &[Checklist]) -> ActualCostSummary {
    let real: Vec<f64> = checklists.iter().filter_map(Checklist::real_cost).collect();
    let summary = summarize(real.iter().copied());
    ActualCostSummary {
        total: summary.total,
        mean: summary.mean,
        max: summary.max,
        min: summary.min,
        count: real.len(),
    }
}

pub(super) fn status_distribution(checklists: &[Checklist]) -> StatusDistribution {
    let mut distribution = StatusDistribution::default();
    for item in checklists.iter().flat_map(Checklist::items) {
        match item.status() {
            ItemStatus::Completed => distribution.completed += 1,
            ItemStatus::Pending => distribution.pending += 1,
            ItemStatus::NeedsReplacement => distribution.needs_replacement += 1,
            ItemStatus::Ignored => distribution.ignored += 1,
        }
    }
    distribution
}

/// Ordinary least squares over (mileage, estimated total) pairs.
pub(super) fn fit_cost_model(checklists: &[Checklist]) -> Option<CostModel> {
    if checklists.len() < 2 {
        return None;
    }

    let n = checklists.len() as f64;
    let xs: Vec<f64> = checklists.iter().map(|c| c.mileage() as f64).collect();
    let ys: Vec<f64> = checklists.iter().map(Checklist::estimated_total_cost).collect();
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (covariance, variance) = xs
        .iter()
        .zip(&ys)
        .fold((0.0, 0.0), |(cov, var), (x, y)| {
            let dx = x - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

    if variance == 0.0 {
        return None;
    }
    let slope = covariance / variance;
    Some(CostModel {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

pub(super) fn history(checklists: &[Checklist]) -> Vec<HistoryPoint> {
    let mut ordered: Vec<&Checklist> = checklists.iter().collect();
    ordered.sort_by_key(|checklist| (checklist.revision_date(), checklist.id()));
    ordered
        .into_iter()
        .map(|checklist| HistoryPoint {
            id: checklist.id(),
            date: checklist.revision_date(),
            formatted_date: checklist.formatted_date(),
            plate: checklist.vehicle().plate().clone(),
            vehicle: checklist.vehicle_label(),
            mileage: checklist.mileage(),
            estimated_cost: checklist.estimated_total_cost(),
            real_cost: checklist.real_cost(),
            finalized: checklist.is_finalized(),
            paid: checklist.is_paid(),
        })
        .collect()
}

/// Per-category counts and costs. Every category is listed, including empty ones.
pub(super) fn category_breakdown(
    checklists: &[Checklist],
    vehicles: &[Motorcycle],
) -> Vec<CategoryBreakdownEntry> {
    MotorcycleCategory::ordered()
        .into_iter()
        .map(|category| {
            let in_category: Vec<&Checklist> = checklists
                .iter()
                .filter(|checklist| checklist.vehicle().category() == category)
                .collect();
            CategoryBreakdownEntry {
                category,
                category_label: category.label(),
                vehicles: vehicles
                    .iter()
                    .filter(|vehicle| vehicle.category() == category)
                    .count(),
                checklists: in_category.len(),
                costs: summarize(in_category.iter().map(|c| c.estimated_total_cost())),
            }
        })
        .collect()
}
