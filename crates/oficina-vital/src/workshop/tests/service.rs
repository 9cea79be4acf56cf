use super::common::{build_service, checklist_with, date, titan};
use crate::workshop::checklist::StatusUpdate;
use crate::workshop::domain::{
    ChecklistItem, DomainError, ItemStatus, MotorcycleCategory, MotorcycleUpdate, Plate,
};
use crate::workshop::query::ChecklistFilter;
use crate::workshop::repository::VehicleRepository;
use crate::workshop::service::WorkshopError;
use crate::workshop::validation::{Advisory, ValidationFailure};
use crate::workshop::Motorcycle;

#[test]
fn registering_a_known_plate_keeps_the_first_record() {
    let (service, _) = build_service();
    service.register_vehicle(titan()).expect("first registration");

    let duplicate = Motorcycle::new(
        "abc-1d23",
        "Yamaha",
        "Factor 150",
        2019,
        149,
        MotorcycleCategory::Street,
    )
    .expect("valid motorcycle");
    let stored = service.register_vehicle(duplicate).expect("duplicate is a no-op");

    assert_eq!(stored.brand(), "Honda");
    assert_eq!(service.vehicles().expect("list").len(), 1);
}

#[test]
fn plate_spellings_resolve_to_the_same_vehicle() {
    let (service, _) = build_service();
    service.register_vehicle(titan()).expect("registered");

    for spelling in ["ABC1D23", "abc1d23", "ABC-1D23", " abc 1d23 "] {
        let plate = Plate::parse(spelling).expect("valid plate");
        assert_eq!(
            service.vehicle(&plate).expect("found").model(),
            "CG 160 Titan"
        );
    }
}

#[test]
fn checklist_for_unknown_vehicle_registers_it() {
    let (service, registry) = build_service();
    let vehicle = titan();

    let registration = service
        .register_checklist(checklist_with(&vehicle, 12_000, date(2025, 3, 1), &[80.0]))
        .expect("checklist accepted");

    assert!(registration.advisories.is_empty());
    assert!(registry
        .fetch_vehicle(vehicle.plate())
        .expect("fetch")
        .is_some());
    let stored = service.checklist(registration.id).expect("stored");
    assert_eq!(stored.estimated_total_cost(), 80.0);
}

#[test]
fn mileage_regression_is_rejected_without_storing() {
    let (service, _) = build_service();
    let vehicle = titan();
    service
        .register_checklist(checklist_with(&vehicle, 15_000, date(2025, 1, 10), &[]))
        .expect("first checklist");

    let error = service
        .register_checklist(checklist_with(&vehicle, 14_000, date(2025, 2, 10), &[]))
        .expect_err("odometer went backwards");

    assert!(matches!(
        error,
        WorkshopError::Validation(ValidationFailure::MileageRegression {
            previous: 15_000,
            current: 14_000,
        })
    ));
    assert_eq!(
        service
            .checklists(&ChecklistFilter::default())
            .expect("list")
            .len(),
        1
    );
}

#[test]
fn mileage_jump_beyond_hard_gap_is_rejected() {
    let (service, _) = build_service();
    let vehicle = titan();
    service
        .register_checklist(checklist_with(&vehicle, 10_000, date(2025, 1, 10), &[]))
        .expect("first checklist");

    let error = service
        .register_checklist(checklist_with(&vehicle, 70_001, date(2025, 2, 10), &[]))
        .expect_err("jump too large");

    assert!(matches!(
        error,
        WorkshopError::Validation(ValidationFailure::MileageJump { gap: 60_001, .. })
    ));
}

#[test]
fn large_gap_and_costs_produce_advisories() {
    let (service, _) = build_service();
    let vehicle = titan();
    service
        .register_checklist(checklist_with(&vehicle, 10_000, date(2025, 1, 10), &[]))
        .expect("first checklist");

    let registration = service
        .register_checklist(checklist_with(
            &vehicle,
            35_000,
            date(2025, 2, 10),
            &[2_500.0, 3_000.0],
        ))
        .expect("accepted with advisories");

    assert!(registration.advisories.contains(&Advisory::MileageGap {
        previous: 10_000,
        current: 35_000,
        gap: 25_000,
    }));
    assert!(registration.advisories.contains(&Advisory::TotalCost {
        total: 5_500.0,
        limit: 5_000.0,
    }));
    let item_advisories = registration
        .advisories
        .iter()
        .filter(|advisory| matches!(advisory, Advisory::ItemCost { .. }))
        .count();
    assert_eq!(item_advisories, 2);
}

#[test]
fn update_item_rejects_out_of_range_index() {
    let (service, _) = build_service();
    let registration = service
        .register_checklist(checklist_with(&titan(), 5_000, date(2025, 1, 10), &[50.0]))
        .expect("registered");

    let error = service
        .update_item(registration.id, 3, Some(ItemStatus::Completed), None)
        .expect_err("index out of range");
    assert!(matches!(
        error,
        WorkshopError::InvalidArgument(DomainError::ItemIndexOutOfBounds { index: 3, len: 1 })
    ));

    let updated = service
        .update_item(registration.id, 0, Some(ItemStatus::Completed), Some(0.0))
        .expect("in range");
    assert_eq!(updated.items()[0].status(), ItemStatus::Completed);
    assert_eq!(updated.estimated_total_cost(), 0.0);
}

#[test]
fn added_items_are_persisted() {
    let (service, _) = build_service();
    let registration = service
        .register_checklist(checklist_with(&titan(), 5_000, date(2025, 1, 10), &[]))
        .expect("registered");

    let item = ChecklistItem::new("Relação", "Transmission", ItemStatus::NeedsReplacement, 320.0)
        .expect("valid item");
    service.add_item(registration.id, item).expect("item added");

    let stored = service.checklist(registration.id).expect("stored");
    assert_eq!(stored.items().len(), 1);
    assert_eq!(stored.estimated_total_cost(), 320.0);
}

#[test]
fn status_update_rejects_negative_real_cost() {
    let (service, _) = build_service();
    let registration = service
        .register_checklist(checklist_with(&titan(), 5_000, date(2025, 1, 10), &[]))
        .expect("registered");

    let error = service
        .update_status(
            registration.id,
            &StatusUpdate {
                finalized: Some(true),
                paid: None,
                real_cost: Some(-10.0),
            },
        )
        .expect_err("negative real cost");
    assert!(matches!(
        error,
        WorkshopError::InvalidArgument(DomainError::NegativeRealCost(_))
    ));

    let stored = service.checklist(registration.id).expect("stored");
    assert!(!stored.is_finalized());
    assert_eq!(stored.real_cost(), None);
}

#[test]
fn deleting_a_vehicle_removes_its_checklists() {
    let (service, _) = build_service();
    let vehicle = titan();
    let other = super::common::bike("XYZ9A87", "Crosser 150", MotorcycleCategory::Trail);
    service
        .register_checklist(checklist_with(&vehicle, 5_000, date(2025, 1, 10), &[]))
        .expect("first");
    service
        .register_checklist(checklist_with(&vehicle, 9_000, date(2025, 2, 10), &[]))
        .expect("second");
    let kept = service
        .register_checklist(checklist_with(&other, 1_000, date(2025, 2, 11), &[]))
        .expect("other vehicle");

    let removed = service.delete_vehicle(vehicle.plate()).expect("deleted");
    assert_eq!(removed, 2);

    let remaining = service
        .checklists(&ChecklistFilter::default())
        .expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), Some(kept.id));
    assert!(matches!(
        service.delete_vehicle(vehicle.plate()),
        Err(WorkshopError::VehicleNotFound(_))
    ));
}

#[test]
fn vehicle_update_refreshes_checklist_snapshots() {
    let (service, _) = build_service();
    let vehicle = titan();
    let registration = service
        .register_checklist(checklist_with(&vehicle, 5_000, date(2025, 1, 10), &[]))
        .expect("registered");

    let update = MotorcycleUpdate {
        model: Some("CG 160 Fan".to_string()),
        ..MotorcycleUpdate::default()
    };
    service
        .update_vehicle(vehicle.plate(), &update)
        .expect("updated");

    let stored = service.checklist(registration.id).expect("stored");
    assert_eq!(stored.vehicle().model(), "CG 160 Fan");
}

#[test]
fn history_lists_newest_revision_first() {
    let (service, _) = build_service();
    let vehicle = titan();
    for (mileage, day) in [(3_000, 5), (6_000, 20), (9_000, 28)] {
        service
            .register_checklist(checklist_with(&vehicle, mileage, date(2025, 1, day), &[]))
            .expect("registered");
    }

    let history = service.vehicle_history(vehicle.plate()).expect("history");
    let mileages: Vec<u64> = history.iter().map(|checklist| checklist.mileage()).collect();
    assert_eq!(mileages, vec![9_000, 6_000, 3_000]);
}

#[test]
fn checklist_keeps_the_registered_vehicle_record() {
    let (service, _) = build_service();
    let registered = service.register_vehicle(titan()).expect("registered");

    let stale = super::common::bike("abc-1d23", "Ninja 400", MotorcycleCategory::Sport);
    let registration = service
        .register_checklist(checklist_with(&stale, 8_000, date(2025, 4, 1), &[150.0]))
        .expect("checklist accepted");

    let stored = service.checklist(registration.id).expect("stored");
    assert_eq!(stored.vehicle(), &registered);
    assert_eq!(stored.vehicle_label(), "CG 160 Titan (ABC1D23)");

    let checklists = service
        .checklists(&ChecklistFilter::default())
        .expect("list");
    let breakdown = crate::workshop::WorkshopAnalytics::new(&checklists)
        .category_breakdown(&service.vehicles().expect("vehicles"));
    let street = breakdown
        .iter()
        .find(|entry| entry.category == MotorcycleCategory::Street)
        .expect("street entry");
    assert_eq!((street.vehicles, street.checklists), (1, 1));
    let sport = breakdown
        .iter()
        .find(|entry| entry.category == MotorcycleCategory::Sport)
        .expect("sport entry");
    assert_eq!(sport.checklists, 0);
}
