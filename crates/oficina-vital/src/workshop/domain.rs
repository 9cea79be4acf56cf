use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Earliest manufacture year accepted for a registered motorcycle.
pub const MIN_MANUFACTURE_YEAR: i32 = 1900;

const DEFAULT_ITEM_CATEGORY: &str = "General";

/// Validation errors raised while building domain values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("invalid plate '{plate}': {reason}")]
    InvalidPlate { plate: String, reason: &'static str },
    #[error("{0} is required")]
    EmptyField(&'static str),
    #[error("manufacture year {0} is before {MIN_MANUFACTURE_YEAR}")]
    InvalidYear(i32),
    #[error("engine displacement must be positive (got {0})")]
    InvalidDisplacement(i32),
    #[error("mileage cannot be negative (got {0})")]
    NegativeMileage(i64),
    #[error("estimated cost cannot be negative (got {0:.2})")]
    NegativeCost(f64),
    #[error("real cost cannot be negative (got {0:.2})")]
    NegativeRealCost(f64),
    #[error("item index {index} is out of bounds for a checklist with {len} item(s)")]
    ItemIndexOutOfBounds { index: usize, len: usize },
    #[error("unknown item status '{0}'")]
    UnknownStatus(String),
    #[error("unknown motorcycle category '{0}'")]
    UnknownCategory(String),
    #[error("unknown period kind '{0}' (expected day, week, month or year)")]
    UnknownPeriod(String),
    #[error("unknown ordering '{0}' (expected date, mileage or cost)")]
    UnknownOrdering(String),
}

/// Normalized license plate used as the registry key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Plate(String);

impl Plate {
    /// Trim, uppercase and strip hyphens/spaces without validating the result.
    pub fn normalize(raw: &str) -> String {
        raw.trim()
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = Self::normalize(raw);
        let invalid = |reason| DomainError::InvalidPlate {
            plate: raw.to_string(),
            reason,
        };

        if normalized.is_empty() {
            return Err(invalid("plate cannot be empty"));
        }
        if normalized.len() < 6 {
            return Err(invalid("plate must have at least 6 characters"));
        }
        if normalized.len() > 8 {
            return Err(invalid("plate must have at most 8 characters"));
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("plate must be alphanumeric"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Plate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Plate {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Plate> for String {
    fn from(value: Plate) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotorcycleCategory {
    Street,
    Sport,
    Trail,
    Custom,
    Scooter,
    Touring,
    #[default]
    Other,
}

impl MotorcycleCategory {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Street,
            Self::Sport,
            Self::Trail,
            Self::Custom,
            Self::Scooter,
            Self::Touring,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Street => "Street",
            Self::Sport => "Sport",
            Self::Trail => "Trail",
            Self::Custom => "Custom",
            Self::Scooter => "Scooter",
            Self::Touring => "Touring",
            Self::Other => "Other",
        }
    }
}

impl FromStr for MotorcycleCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "street" | "naked" => Ok(Self::Street),
            "sport" | "esportiva" => Ok(Self::Sport),
            "trail" | "off_road" | "offroad" => Ok(Self::Trail),
            "custom" => Ok(Self::Custom),
            "scooter" => Ok(Self::Scooter),
            "touring" => Ok(Self::Touring),
            "" | "other" | "outros" => Ok(Self::Other),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

/// Registered motorcycle. Fields are private so every instance is validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Motorcycle {
    plate: Plate,
    brand: String,
    model: String,
    year: i32,
    displacement_cc: u32,
    category: MotorcycleCategory,
}

impl Motorcycle {
    pub fn new(
        plate: &str,
        brand: &str,
        model: &str,
        year: i32,
        displacement_cc: i32,
        category: MotorcycleCategory,
    ) -> Result<Self, DomainError> {
        let plate = Plate::parse(plate)?;
        let brand = required("brand", brand)?;
        let model = required("model", model)?;
        validate_year(year)?;
        let displacement_cc = validate_displacement(displacement_cc)?;

        Ok(Self {
            plate,
            brand,
            model,
            year,
            displacement_cc,
            category,
        })
    }

    pub fn plate(&self) -> &Plate {
        &self.plate
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn displacement_cc(&self) -> u32 {
        self.displacement_cc
    }

    pub fn category(&self) -> MotorcycleCategory {
        self.category
    }

    /// Label used in charts and logs, e.g. `MT-07 (ABC1D23)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.model, self.plate)
    }

    /// Apply a partial update; nothing changes unless every field validates.
    pub fn apply(&mut self, update: &MotorcycleUpdate) -> Result<(), DomainError> {
        let brand = update
            .brand
            .as_deref()
            .map(|value| required("brand", value))
            .transpose()?;
        let model = update
            .model
            .as_deref()
            .map(|value| required("model", value))
            .transpose()?;
        if let Some(year) = update.year {
            validate_year(year)?;
        }
        let displacement_cc = update
            .displacement_cc
            .map(validate_displacement)
            .transpose()?;

        if let Some(brand) = brand {
            self.brand = brand;
        }
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(year) = update.year {
            self.year = year;
        }
        if let Some(displacement_cc) = displacement_cc {
            self.displacement_cc = displacement_cc;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        Ok(())
    }
}

/// Partial attribute update for a registered motorcycle. The plate never changes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MotorcycleUpdate {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub displacement_cc: Option<i32>,
    #[serde(default)]
    pub category: Option<MotorcycleCategory>,
}

fn required(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

fn validate_year(year: i32) -> Result<(), DomainError> {
    if year < MIN_MANUFACTURE_YEAR {
        return Err(DomainError::InvalidYear(year));
    }
    Ok(())
}

fn validate_displacement(displacement_cc: i32) -> Result<u32, DomainError> {
    u32::try_from(displacement_cc)
        .ok()
        .filter(|value| *value > 0)
        .ok_or(DomainError::InvalidDisplacement(displacement_cc))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Completed,
    Pending,
    NeedsReplacement,
    Ignored,
}

impl ItemStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Completed,
            Self::Pending,
            Self::NeedsReplacement,
            Self::Ignored,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::NeedsReplacement => "Needs Replacement",
            Self::Ignored => "Ignored",
        }
    }

    pub const fn counts_toward_cost(self) -> bool {
        match self {
            Self::NeedsReplacement => true,
            Self::Completed | Self::Pending | Self::Ignored => false,
        }
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "completed" | "concluido" => Ok(Self::Completed),
            "pending" | "pendente" => Ok(Self::Pending),
            "needs_replacement" | "necessita_troca" => Ok(Self::NeedsReplacement),
            "ignored" | "ignorado" => Ok(Self::Ignored),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}

/// One inspected component of a checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItem {
    name: String,
    category: String,
    status: ItemStatus,
    estimated_cost: f64,
}

impl ChecklistItem {
    pub fn new(
        name: &str,
        category: &str,
        status: ItemStatus,
        estimated_cost: f64,
    ) -> Result<Self, DomainError> {
        let name = required("item name", name)?;
        let category = match category.trim() {
            "" => DEFAULT_ITEM_CATEGORY.to_string(),
            trimmed => trimmed.to_string(),
        };
        validate_cost(estimated_cost)?;

        Ok(Self {
            name,
            category,
            status,
            estimated_cost,
        })
    }

    /// Fresh inspection item: pending, no cost.
    pub fn pending(name: &str, category: &str) -> Result<Self, DomainError> {
        Self::new(name, category, ItemStatus::Pending, 0.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn estimated_cost(&self) -> f64 {
        self.estimated_cost
    }

    pub fn set_status(&mut self, status: ItemStatus) {
        self.status = status;
    }

    pub fn set_estimated_cost(&mut self, cost: f64) -> Result<(), DomainError> {
        validate_cost(cost)?;
        self.estimated_cost = cost;
        Ok(())
    }

    /// Cost contributed to the checklist's estimated total.
    pub fn billable_cost(&self) -> f64 {
        if self.status.counts_toward_cost() {
            self.estimated_cost
        } else {
            0.0
        }
    }
}

pub(crate) fn validate_cost(cost: f64) -> Result<(), DomainError> {
    if cost.is_nan() || cost < 0.0 {
        return Err(DomainError::NegativeCost(cost));
    }
    Ok(())
}
