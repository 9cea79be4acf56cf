use super::domain::{DomainError, Motorcycle, MotorcycleCategory};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, source: DomainError },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read fleet file: {err}"),
            ImportError::Csv(err) => write!(f, "invalid fleet CSV data: {err}"),
            ImportError::InvalidRow { line, source } => {
                write!(f, "fleet CSV line {line} is invalid: {source}")
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidRow { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct FleetRow {
    plate: String,
    brand: String,
    model: String,
    year: i32,
    displacement_cc: i32,
    #[serde(default)]
    category: String,
}

impl FleetRow {
    fn into_motorcycle(self) -> Result<Motorcycle, DomainError> {
        let category = self.category.parse::<MotorcycleCategory>()?;
        Motorcycle::new(
            &self.plate,
            &self.brand,
            &self.model,
            self.year,
            self.displacement_cc,
            category,
        )
    }
}

/// Parse a fleet export with header `plate,brand,model,year,displacement_cc,category`.
///
/// Stops at the first row that does not describe a valid motorcycle.
pub fn parse_fleet<R: Read>(reader: R) -> Result<Vec<Motorcycle>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut fleet = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: FleetRow = record.deserialize(Some(&headers))?;
        let motorcycle = row
            .into_motorcycle()
            .map_err(|source| ImportError::InvalidRow { line, source })?;
        fleet.push(motorcycle);
    }

    Ok(fleet)
}

pub fn read_fleet_file(path: impl AsRef<Path>) -> Result<Vec<Motorcycle>, ImportError> {
    let file = File::open(path)?;
    parse_fleet(file)
}
