use super::checklist::Checklist;
use super::domain::{ChecklistItem, DomainError, Motorcycle};
use chrono::NaiveDate;
use serde::Serialize;

/// Inspection item blueprint: category plus item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemTemplate {
    pub category: &'static str,
    pub name: &'static str,
}

const fn item(category: &'static str, name: &'static str) -> ItemTemplate {
    ItemTemplate { category, name }
}

/// Items inspected on every visit regardless of mileage.
pub const BASELINE_ITEMS: [ItemTemplate; 26] = [
    item("Engine", "Óleo do motor"),
    item("Engine", "Filtro de óleo"),
    item("Engine", "Filtro de ar"),
    item("Engine", "Velas de ignição"),
    item("Engine", "Verificar vazamentos de óleo/fluídos"),
    item("Transmission", "Corrente (tensão e lubrificação)"),
    item("Transmission", "Coroa e pinhão"),
    item("Transmission", "Folga/desgaste da transmissão"),
    item("Brakes", "Pastilhas de freio dianteiras"),
    item("Brakes", "Pastilhas de freio traseiras"),
    item("Brakes", "Fluido de freio"),
    item("Brakes", "Discos de freio"),
    item("Tires", "Pneu dianteiro"),
    item("Tires", "Pneu traseiro"),
    item("Tires", "Rodas/raios"),
    item("Suspension", "Bengalas dianteiras (vazamento)"),
    item("Suspension", "Amortecedor traseiro"),
    item("Electrical", "Bateria"),
    item("Electrical", "Farol alto/baixo"),
    item("Electrical", "Setas"),
    item("Electrical", "Luz de freio"),
    item("Electrical", "Iluminação do painel"),
    item("Safety", "Retrovisores"),
    item("Safety", "Manetes e cabos"),
    item("Safety", "Retorno do acelerador"),
    item("Safety", "Ruídos anormais no teste"),
];

/// Extra items that become due once the odometer reaches each threshold (km).
/// Thresholds are cumulative: a bike at 32,000 km gets every tier up to 30,000.
pub const MILEAGE_TIERS: &[(u64, &[ItemTemplate])] = &[
    (
        10_000,
        &[
            item("Engine", "Verificar tensão da correia (se aplicável)"),
            item("Transmission", "Verificar desgaste da corrente"),
        ],
    ),
    (
        15_000,
        &[
            item("Engine", "Verificar sistema de arrefecimento"),
            item("Electrical", "Verificar sistema de carga"),
        ],
    ),
    (
        20_000,
        &[
            item("Engine", "Verificar válvulas"),
            item("Engine", "Verificar compressão do motor"),
            item("Suspension", "Verificar rolamentos das rodas"),
        ],
    ),
    (
        25_000,
        &[
            item("Transmission", "Verificar desgaste da coroa e pinhão"),
            item("Electrical", "Verificar cabos e conexões"),
        ],
    ),
    (
        30_000,
        &[
            item("Transmission", "Troca de correia/corrente (se aplicável)"),
            item("Engine", "Limpeza de bico injetor/carburador"),
            item("Suspension", "Verificar amortecedores (vazamento)"),
        ],
    ),
    (
        40_000,
        &[
            item("Engine", "Verificar sistema de escape"),
            item("Electrical", "Verificar alternador/regulador"),
        ],
    ),
    (
        50_000,
        &[
            item("Engine", "Verificar cabeçote e junta"),
            item("Transmission", "Verificar caixa de câmbio"),
            item("Suspension", "Revisão completa da suspensão"),
        ],
    ),
];

/// Adaptive items due at `mileage`, in tier order, without duplicates.
pub fn items_for_mileage(mileage: u64) -> Vec<ItemTemplate> {
    let mut items: Vec<ItemTemplate> = Vec::new();
    for (threshold, tier) in MILEAGE_TIERS {
        if mileage < *threshold {
            break;
        }
        for template in tier.iter() {
            if !items.contains(template) {
                items.push(*template);
            }
        }
    }
    items
}

/// Baseline checklist: every item pending with no cost.
pub fn standard_checklist(
    vehicle: Motorcycle,
    mileage: i64,
    revision_date: Option<NaiveDate>,
) -> Result<Checklist, DomainError> {
    let mut checklist = Checklist::new(vehicle, mileage, revision_date)?;
    append_pending(&mut checklist, BASELINE_ITEMS.iter())?;
    Ok(checklist)
}

/// Baseline checklist followed by the items due at `mileage`.
pub fn adaptive_checklist(
    vehicle: Motorcycle,
    mileage: i64,
    revision_date: Option<NaiveDate>,
) -> Result<Checklist, DomainError> {
    let mut checklist = standard_checklist(vehicle, mileage, revision_date)?;
    let extra = items_for_mileage(checklist.mileage());
    append_pending(&mut checklist, extra.iter())?;
    Ok(checklist)
}

fn append_pending<'a>(
    checklist: &mut Checklist,
    templates: impl Iterator<Item = &'a ItemTemplate>,
) -> Result<(), DomainError> {
    for template in templates {
        checklist.add_item(ChecklistItem::pending(template.name, template.category)?);
    }
    Ok(())
}
