use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use kara_core::{
    config::Config,
    core::services::{DayAggregator, DueCalendarService},
    domain::{
        CaisseType, Contract, ContractStatus, DueEntry, DueStatus, Member, ParentKind,
        ParentSummary, ScheduledItem, TypeFilter, TypeTag,
    },
    storage::{json_backend::save_snapshot_to_path, JsonStore, MemoryStore},
};
use tempfile::tempdir;

const STATUSES: [DueStatus; 4] = [
    DueStatus::Due,
    DueStatus::Paid,
    DueStatus::Refused,
    DueStatus::Partial,
];

fn build_store(contract_count: usize, items_per_contract: u32) -> MemoryStore {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let mut store = MemoryStore::new();

    for idx in 0..contract_count {
        let member_id = format!("m{idx}");
        let contract_id = format!("c{idx}");
        let caisse = CaisseType::ALL[idx % CaisseType::ALL.len()];
        store
            .add_member(Member::new(member_id.clone(), "Member", format!("{idx}")))
            .add_contract(Contract::for_member(
                contract_id.clone(),
                caisse,
                ContractStatus::Active,
                member_id,
            ));
        for index in 0..items_per_contract {
            let due = start + Duration::days((idx as i64 + index as i64 * 7) % 365);
            let status = STATUSES[(idx + index as usize) % STATUSES.len()];
            store.add_contract_payment(ScheduledItem::new(
                contract_id.clone(),
                index,
                due,
                5_000 + (idx as i64 % 20) * 500,
                status,
            ));
        }
    }
    store
}

fn build_entries(count: usize) -> Vec<DueEntry> {
    let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    (0..count)
        .map(|idx| {
            let parent_id = format!("c{}", idx % 500);
            DueEntry {
                item: ScheduledItem::new(
                    parent_id.clone(),
                    idx as u32,
                    start + Duration::days((idx % 30) as i64),
                    10_000,
                    STATUSES[idx % STATUSES.len()],
                ),
                parent: ParentSummary {
                    id: parent_id,
                    kind: ParentKind::Contract,
                    type_tag: TypeTag::Caisse(CaisseType::ALL[idx % CaisseType::ALL.len()]),
                },
                display_name: Some("Member".into()),
            }
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let entries = build_entries(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("aggregate_10k_entries", |b| {
        b.iter_batched(
            || entries.clone(),
            |entries| black_box(DayAggregator::aggregate(entries, today)),
            BatchSize::LargeInput,
        )
    });
}

fn bench_calendar(c: &mut Criterion) {
    let store = build_store(black_box(1_000), 24);
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    for concurrency in [1, 8] {
        let config = Config {
            fetch_concurrency: concurrency,
            ..Config::default()
        };
        c.bench_function(&format!("contract_calendar_1k_c{concurrency}"), |b| {
            b.iter(|| {
                let report = DueCalendarService::new(&store, &config)
                    .contract_calendar(today, &TypeFilter::all(), today)
                    .expect("calendar");
                black_box(report);
            })
        });
    }
}

fn bench_snapshot_io(c: &mut Criterion) {
    let store = build_store(black_box(1_000), 24);
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("snapshot.json");
    save_snapshot_to_path(store.snapshot(), &file_path).expect("seed");

    c.bench_function("snapshot_load_1k_contracts", |b| {
        b.iter(|| {
            let loaded = JsonStore::open(&file_path).expect("open snapshot");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_aggregation, bench_calendar, bench_snapshot_io);
criterion_main!(benches);
