use super::super::checklist::Checklist;
use super::super::domain::{DomainError, Plate};
use super::views::FinancialReport;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Calendar bucket for a financial report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl ReportPeriod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }

    /// Inclusive `[start, end]` window containing `reference`. Weeks start on Monday.
    pub fn window(self, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Day => (reference, reference),
            Self::Week => {
                let offset = u64::from(reference.weekday().num_days_from_monday());
                let start = reference.checked_sub_days(Days::new(offset)).unwrap_or(reference);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(reference);
                (start, end)
            }
            Self::Month => {
                let start = reference.with_day(1).unwrap_or(reference);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(reference);
                (start, end)
            }
            Self::Year => {
                let start = reference.with_ordinal(1).unwrap_or(reference);
                let end = NaiveDate::from_ymd_opt(reference.year(), 12, 31).unwrap_or(reference);
                (start, end)
            }
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "dia" => Ok(Self::Day),
            "week" | "weekly" | "semana" => Ok(Self::Week),
            "month" | "monthly" | "mes" | "mês" => Ok(Self::Month),
            "year" | "yearly" | "ano" => Ok(Self::Year),
            _ => Err(DomainError::UnknownPeriod(s.to_string())),
        }
    }
}

/// Revenue comes from paid checklists' estimates; cost from every recorded real cost.
pub(super) fn financial_report(
    checklists: &[Checklist],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    period: Option<ReportPeriod>,
) -> FinancialReport {
    let in_scope: Vec<&Checklist> = checklists
        .iter()
        .filter(|checklist| start.map_or(true, |start| checklist.revision_date() >= start))
        .filter(|checklist| end.map_or(true, |end| checklist.revision_date() <= end))
        .collect();

    let revenue: f64 = in_scope
        .iter()
        .filter(|checklist| checklist.is_paid())
        .map(|checklist| checklist.estimated_total_cost())
        .sum();
    let cost: f64 = in_scope.iter().filter_map(|checklist| checklist.real_cost()).sum();
    let vehicles: BTreeSet<&Plate> = in_scope
        .iter()
        .map(|checklist| checklist.vehicle().plate())
        .collect();

    let services = in_scope.len();
    let paid = in_scope.iter().filter(|checklist| checklist.is_paid()).count();
    let average_ticket = if services == 0 {
        0.0
    } else {
        revenue / services as f64
    };

    FinancialReport {
        period,
        start,
        end,
        revenue,
        cost,
        profit: revenue - cost,
        vehicles: vehicles.len(),
        services,
        paid,
        unpaid: services - paid,
        average_ticket,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn month_window_respects_leap_years() {
        assert_eq!(
            ReportPeriod::Month.window(date(2024, 2, 15)),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            ReportPeriod::Month.window(date(2025, 2, 15)),
            (date(2025, 2, 1), date(2025, 2, 28))
        );
        assert_eq!(
            ReportPeriod::Month.window(date(2025, 12, 31)),
            (date(2025, 12, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn week_window_starts_on_monday() {
        // 2025-06-15 is a Sunday.
        assert_eq!(
            ReportPeriod::Week.window(date(2025, 6, 15)),
            (date(2025, 6, 9), date(2025, 6, 15))
        );
        assert_eq!(
            ReportPeriod::Week.window(date(2025, 6, 9)),
            (date(2025, 6, 9), date(2025, 6, 15))
        );
    }

    #[test]
    fn day_and_year_windows() {
        let reference = date(2024, 7, 4);
        assert_eq!(ReportPeriod::Day.window(reference), (reference, reference));
        assert_eq!(
            ReportPeriod::Year.window(reference),
            (date(2024, 1, 1), date(2024, 12, 31))
        );
    }

    #[test]
    fn parses_period_names() {
        assert_eq!("Semana".parse::<ReportPeriod>(), Ok(ReportPeriod::Week));
        assert_eq!("mês".parse::<ReportPeriod>(), Ok(ReportPeriod::Month));
        assert_eq!(
            "fortnight".parse::<ReportPeriod>(),
            Err(DomainError::UnknownPeriod("fortnight".to_string()))
        );
    }

    #[test]
    fn empty_scope_reports_zeroes() {
        let report = financial_report(&[], None, None, None);
        assert_eq!(report.services, 0);
        assert_eq!(report.average_ticket, 0.0);
        assert_eq!(report.profit, 0.0);
    }
}
