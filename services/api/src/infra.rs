use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use oficina_vital::workshop::{
    DomainError, InMemoryRegistry, Motorcycle, MotorcycleCategory, WorkshopService,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) workshop: Arc<WorkshopService<InMemoryRegistry>>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// One workshop visit used to seed the demo registry.
pub(crate) struct SampleVisit {
    pub(crate) plate: &'static str,
    pub(crate) mileage: i64,
    pub(crate) days_ago: u64,
    /// Template items found worn, with the quoted replacement cost.
    pub(crate) replacements: &'static [(&'static str, f64)],
    pub(crate) finalized: bool,
    pub(crate) paid: bool,
    pub(crate) real_cost: Option<f64>,
}

pub(crate) fn sample_fleet() -> Result<Vec<Motorcycle>, DomainError> {
    Ok(vec![
        Motorcycle::new(
            "ABC1D23",
            "Honda",
            "CG 160 Titan",
            2022,
            162,
            MotorcycleCategory::Street,
        )?,
        Motorcycle::new(
            "XYZ9A87",
            "Yamaha",
            "Lander 250",
            2021,
            249,
            MotorcycleCategory::Trail,
        )?,
        Motorcycle::new(
            "KWS4F56",
            "Kawasaki",
            "Ninja 400",
            2023,
            399,
            MotorcycleCategory::Sport,
        )?,
        Motorcycle::new(
            "HDS7C89",
            "Harley-Davidson",
            "Iron 883",
            2019,
            883,
            MotorcycleCategory::Custom,
        )?,
    ])
}

pub(crate) const SAMPLE_VISITS: &[SampleVisit] = &[
    SampleVisit {
        plate: "ABC1D23",
        mileage: 15_000,
        days_ago: 75,
        replacements: &[
            ("Óleo do motor", 60.0),
            ("Filtro de óleo", 35.0),
            ("Pastilhas de freio dianteiras", 120.0),
        ],
        finalized: true,
        paid: true,
        real_cost: Some(140.0),
    },
    SampleVisit {
        plate: "XYZ9A87",
        mileage: 30_000,
        days_ago: 40,
        replacements: &[("Óleo do motor", 70.0), ("Verificar válvulas", 250.0)],
        finalized: true,
        paid: true,
        real_cost: Some(210.0),
    },
    SampleVisit {
        plate: "HDS7C89",
        mileage: 41_000,
        days_ago: 20,
        replacements: &[
            ("Pneu dianteiro", 650.0),
            ("Pneu traseiro", 780.0),
            ("Bateria", 520.0),
        ],
        finalized: true,
        paid: true,
        real_cost: Some(1_350.0),
    },
    SampleVisit {
        plate: "ABC1D23",
        mileage: 22_000,
        days_ago: 10,
        replacements: &[
            ("Corrente (tensão e lubrificação)", 180.0),
            ("Coroa e pinhão", 150.0),
            ("Pneu traseiro", 420.0),
        ],
        finalized: true,
        paid: false,
        real_cost: Some(480.0),
    },
    SampleVisit {
        plate: "KWS4F56",
        mileage: 8_000,
        days_ago: 3,
        replacements: &[("Fluido de freio", 90.0)],
        finalized: false,
        paid: false,
        real_cost: None,
    },
];
