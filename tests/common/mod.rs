#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use kara_core::{
    domain::{
        CaisseType, Contract, ContractStatus, DueStatus, Group, Member, PayoutMode, Placement,
        PlacementStatus, ScheduledItem,
    },
    storage::{json_backend::save_snapshot_to_path, MemoryStore, StoreSnapshot},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).expect("valid May date")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// A store with one member contract carrying a single due item.
pub fn single_item_store(due: NaiveDate, amount: i64, status: DueStatus) -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .add_member(Member::new("m1", "Awa", "Ndiaye"))
        .add_contract(Contract::for_member(
            "c1",
            CaisseType::Standard,
            ContractStatus::Active,
            "m1",
        ))
        .add_contract_payment(ScheduledItem::new("c1", 0, due, amount, status));
    store
}

/// A realistic month of contracts and placements for May 2024.
pub fn sample_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .add_member(Member::new("m1", "Awa", "Ndiaye"))
        .add_member(Member::new("m2", "Paul", "Essomba"))
        .add_group(Group::new("g1", "Tontine Espoir"))
        .add_contract(Contract::for_member(
            "c1",
            CaisseType::Standard,
            ContractStatus::Active,
            "m1",
        ))
        .add_contract(Contract::for_member(
            "c2",
            CaisseType::Journaliere,
            ContractStatus::LateNoPenalty,
            "m2",
        ))
        .add_contract(Contract::for_group(
            "c3",
            CaisseType::Libre,
            ContractStatus::LateWithPenalty,
            "g1",
        ))
        .add_contract(Contract::for_member(
            "c4",
            CaisseType::Standard,
            ContractStatus::Closed,
            "m2",
        ))
        .add_contract_payment(ScheduledItem::new(
            "c1",
            0,
            date(2024, 4, 5),
            10_000,
            DueStatus::Paid,
        ))
        .add_contract_payment(ScheduledItem::new("c1", 1, may(5), 10_000, DueStatus::Paid))
        .add_contract_payment(ScheduledItem::new(
            "c1",
            2,
            date(2024, 6, 5),
            10_000,
            DueStatus::Due,
        ))
        .add_contract_payment(ScheduledItem::new("c2", 0, may(5), 3_000, DueStatus::Due))
        .add_contract_payment(ScheduledItem::new("c2", 1, may(6), 3_000, DueStatus::Due))
        .add_contract_payment(ScheduledItem::new("c2", 2, may(7), 3_000, DueStatus::Refused))
        .add_contract_payment(ScheduledItem::new("c3", 0, may(12), 25_000, DueStatus::Due))
        .add_contract_payment(ScheduledItem::new("c3", 1, may(31), 25_000, DueStatus::Due))
        .add_contract_payment(ScheduledItem::new("c4", 0, may(12), 99_000, DueStatus::Due))
        .add_placement(
            Placement::new(
                "p1",
                "b1",
                PayoutMode::MonthlyCommissionFinalCapital,
                PlacementStatus::Active,
            )
            .with_benefactor_name("Jean Mba"),
        )
        .add_placement(
            Placement::new(
                "p2",
                "b2",
                PayoutMode::CapitalPlusCommissionsAtEnd,
                PlacementStatus::Active,
            )
            .with_benefactor_name("Marie Owona"),
        )
        .add_placement(Placement::new(
            "p3",
            "b3",
            PayoutMode::MonthlyCommissionFinalCapital,
            PlacementStatus::Draft,
        ))
        .add_commission(ScheduledItem::new("p1", 0, may(10), 15_000, DueStatus::Partial))
        .add_commission(ScheduledItem::new("p1", 1, may(20), 15_000, DueStatus::Due))
        .add_commission(ScheduledItem::new("p2", 0, may(20), 40_000, DueStatus::Paid))
        .add_commission(ScheduledItem::new("p3", 0, may(20), 1_000, DueStatus::Due));
    store
}

/// Writes `snapshot` into a fresh temporary directory and returns the file path.
pub fn write_snapshot(snapshot: &StoreSnapshot) -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("snapshot.json");
    save_snapshot_to_path(snapshot, &path).expect("write snapshot");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// A fresh, empty directory usable as `KARA_HOME`.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}
