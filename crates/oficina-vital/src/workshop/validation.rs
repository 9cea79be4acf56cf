use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Thresholds applied before a checklist is accepted into the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationPolicy {
    /// Mileage increase above which registration succeeds with an advisory.
    pub mileage_advisory_gap: u64,
    /// Mileage increase above which registration is refused.
    pub mileage_hard_gap: u64,
    pub cost_alert_limit: f64,
    pub item_cost_alert_limit: f64,
    pub max_age_days: i64,
    pub max_future_days: i64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            mileage_advisory_gap: 20_000,
            mileage_hard_gap: 50_000,
            cost_alert_limit: 5_000.0,
            item_cost_alert_limit: 2_000.0,
            max_age_days: 730,
            max_future_days: 1,
        }
    }
}

/// Non-blocking warning attached to an accepted checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    MileageGap { previous: u64, current: u64, gap: u64 },
    TotalCost { total: f64, limit: f64 },
    ItemCost { item: String, cost: f64, limit: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MileageGap { gap, .. } => {
                write!(f, "{gap} km since the last revision; confirm the odometer reading")
            }
            Advisory::TotalCost { total, limit } => {
                write!(f, "total cost {total:.2} exceeds the alert limit of {limit:.2}")
            }
            Advisory::ItemCost { item, cost, limit } => {
                write!(f, "cost {cost:.2} for '{item}' exceeds the reasonable limit of {limit:.2}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("mileage cannot be negative (got {0})")]
    NegativeMileage(i64),
    #[error("mileage {current} is below the last revision at {previous}")]
    MileageRegression { previous: u64, current: u64 },
    #[error("mileage jumped {gap} km since the last revision (limit {limit})")]
    MileageJump { gap: u64, limit: u64 },
    #[error("cost cannot be negative (got {0:.2})")]
    NegativeCost(f64),
    #[error("revision date {date} is more than {max_days} days in the past")]
    RevisionTooOld { date: NaiveDate, max_days: i64 },
    #[error("revision date {date} is more than {max_days} day(s) in the future")]
    RevisionInFuture { date: NaiveDate, max_days: i64 },
}

pub type ValidationOutcome = Result<Option<Advisory>, ValidationFailure>;

impl ValidationPolicy {
    /// Compare a new odometer reading with the vehicle's latest checklist.
    pub fn check_mileage(&self, current: i64, previous: Option<u64>) -> ValidationOutcome {
        let current =
            u64::try_from(current).map_err(|_| ValidationFailure::NegativeMileage(current))?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        if current < previous {
            return Err(ValidationFailure::MileageRegression { previous, current });
        }

        let gap = current - previous;
        if gap > self.mileage_hard_gap {
            return Err(ValidationFailure::MileageJump {
                gap,
                limit: self.mileage_hard_gap,
            });
        }
        if gap > self.mileage_advisory_gap {
            return Ok(Some(Advisory::MileageGap {
                previous,
                current,
                gap,
            }));
        }
        Ok(None)
    }

    pub fn check_total_cost(&self, total: f64) -> ValidationOutcome {
        if total.is_nan() || total < 0.0 {
            return Err(ValidationFailure::NegativeCost(total));
        }
        if total > self.cost_alert_limit {
            return Ok(Some(Advisory::TotalCost {
                total,
                limit: self.cost_alert_limit,
            }));
        }
        Ok(None)
    }

    pub fn check_item_cost(&self, name: &str, cost: f64) -> ValidationOutcome {
        if cost.is_nan() || cost < 0.0 {
            return Err(ValidationFailure::NegativeCost(cost));
        }
        if cost > self.item_cost_alert_limit {
            return Ok(Some(Advisory::ItemCost {
                item: name.to_string(),
                cost,
                limit: self.item_cost_alert_limit,
            }));
        }
        Ok(None)
    }

    /// Reject revision dates far in the past or scheduled too far ahead of `today`.
    pub fn check_revision_date(&self, date: NaiveDate, today: NaiveDate) -> ValidationOutcome {
        let offset = (date - today).num_days();
        if offset < -self.max_age_days {
            return Err(ValidationFailure::RevisionTooOld {
                date,
                max_days: self.max_age_days,
            });
        }
        if offset > self.max_future_days {
            return Err(ValidationFailure::RevisionInFuture {
                date,
                max_days: self.max_future_days,
            });
        }
        Ok(None)
    }
}
