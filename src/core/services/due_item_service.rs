use std::thread;

use tracing::{debug, info, warn};

use crate::{
    domain::{
        CaisseType, Contract, ContractHolder, Displayable, DueEntry, FetchDiagnostic, FetchStage,
        MonthWindow, ParentKind, ParentSummary, PayoutMode, Placement, ScheduledItem, TypeFilter,
        TypeTag,
    },
    errors::KaraError,
    storage::DocumentStore,
};

use super::ServiceResult;

/// Flat, unordered list of due entries plus the per-parent failures recovered
/// while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub entries: Vec<DueEntry>,
    pub diagnostics: Vec<FetchDiagnostic>,
}

impl FetchOutcome {
    fn absorb(&mut self, other: FetchOutcome) {
        self.entries.extend(other.entries);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Pulls the scheduled items due in a month across every eligible parent.
///
/// Only the parent listing is fatal; item fetches and name lookups fail per
/// parent and are reported as diagnostics.
pub struct DueItemService<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    concurrency: usize,
}

impl<'a, S: DocumentStore + ?Sized> DueItemService<'a, S> {
    pub fn new(store: &'a S, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    pub fn contract_items(
        &self,
        month: MonthWindow,
        filter: &TypeFilter<CaisseType>,
    ) -> ServiceResult<FetchOutcome> {
        let contracts: Vec<Contract> = self
            .store
            .list_contracts()?
            .into_iter()
            .filter(|contract| contract.status.is_active_like())
            .filter(|contract| filter.allows(&contract.caisse_type))
            .collect();
        info!(
            month = %month.label(),
            eligible = contracts.len(),
            "fetching contract payments"
        );

        let outcome = self.fan_out(&contracts, |contract| self.contract_job(contract, month));
        info!(
            month = %month.label(),
            items = outcome.entries.len(),
            failures = outcome.diagnostics.len(),
            "contract payments fetched"
        );
        Ok(outcome)
    }

    pub fn commission_items(
        &self,
        month: MonthWindow,
        filter: &TypeFilter<PayoutMode>,
    ) -> ServiceResult<FetchOutcome> {
        let placements: Vec<Placement> = self
            .store
            .list_placements()?
            .into_iter()
            .filter(|placement| placement.status.is_active_like())
            .filter(|placement| filter.allows(&placement.payout_mode))
            .collect();
        info!(
            month = %month.label(),
            eligible = placements.len(),
            "fetching placement commissions"
        );

        let outcome = self.fan_out(&placements, |placement| {
            self.placement_job(placement, month)
        });
        info!(
            month = %month.label(),
            items = outcome.entries.len(),
            failures = outcome.diagnostics.len(),
            "placement commissions fetched"
        );
        Ok(outcome)
    }

    fn contract_job(&self, contract: &Contract, month: MonthWindow) -> FetchOutcome {
        let parent = ParentSummary {
            id: contract.id.clone(),
            kind: ParentKind::Contract,
            type_tag: TypeTag::Caisse(contract.caisse_type),
        };
        let items = match self.store.list_contract_payments(&contract.id) {
            Ok(items) => within_month(items, month),
            Err(err) => {
                warn!(contract = %contract.id, error = %err, "failed to list contract payments");
                return FetchOutcome {
                    entries: Vec::new(),
                    diagnostics: vec![diagnostic(&parent, FetchStage::Items, &err)],
                };
            }
        };
        if items.is_empty() {
            return FetchOutcome::default();
        }

        let mut diagnostics = Vec::new();
        let display_name = match self.holder_name(&contract.holder) {
            Ok(name) => name,
            Err(err) => {
                warn!(contract = %contract.id, error = %err, "failed to resolve holder name");
                diagnostics.push(diagnostic(&parent, FetchStage::DisplayName, &err));
                None
            }
        };

        FetchOutcome {
            entries: pair_with_parent(items, &parent, display_name),
            diagnostics,
        }
    }

    fn placement_job(&self, placement: &Placement, month: MonthWindow) -> FetchOutcome {
        let parent = ParentSummary {
            id: placement.id.clone(),
            kind: ParentKind::Placement,
            type_tag: TypeTag::Payout(placement.payout_mode),
        };
        let items = match self.store.list_commissions(&placement.id) {
            Ok(items) => within_month(items, month),
            Err(err) => {
                warn!(placement = %placement.id, error = %err, "failed to list commissions");
                return FetchOutcome {
                    entries: Vec::new(),
                    diagnostics: vec![diagnostic(&parent, FetchStage::Items, &err)],
                };
            }
        };

        let display_name = placement
            .benefactor_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        FetchOutcome {
            entries: pair_with_parent(items, &parent, display_name),
            diagnostics: Vec::new(),
        }
    }

    fn holder_name(&self, holder: &ContractHolder) -> Result<Option<String>, KaraError> {
        let label = match holder {
            ContractHolder::Member { member_id } => self
                .store
                .member(member_id)?
                .ok_or_else(|| KaraError::NotFound(format!("member `{member_id}`")))?
                .display_label(),
            ContractHolder::Group { group_id } => self
                .store
                .group(group_id)?
                .ok_or_else(|| KaraError::NotFound(format!("group `{group_id}`")))?
                .display_label(),
        };
        Ok((!label.is_empty()).then_some(label))
    }

    /// Runs `job` for every parent, at most `concurrency` at a time.
    fn fan_out<P, F>(&self, parents: &[P], job: F) -> FetchOutcome
    where
        P: Sync,
        F: Fn(&P) -> FetchOutcome + Sync,
    {
        let mut outcome = FetchOutcome::default();
        if self.concurrency == 1 {
            for parent in parents {
                outcome.absorb(job(parent));
            }
            return outcome;
        }

        let job = &job;
        for batch in parents.chunks(self.concurrency) {
            let results: Vec<FetchOutcome> = thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|parent| scope.spawn(move || job(parent)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                    })
                    .collect()
            });
            for result in results {
                outcome.absorb(result);
            }
        }
        outcome
    }
}

fn diagnostic(parent: &ParentSummary, stage: FetchStage, err: &KaraError) -> FetchDiagnostic {
    FetchDiagnostic {
        parent_id: parent.id.clone(),
        parent_kind: parent.kind,
        stage,
        message: err.to_string(),
    }
}

/// Keeps items dated inside the month; undated items are dropped.
fn within_month(items: Vec<ScheduledItem>, month: MonthWindow) -> Vec<ScheduledItem> {
    items
        .into_iter()
        .filter(|item| match item.due_date {
            Some(due) => month.contains(due),
            None => {
                debug!(item = %item.id, "dropping item without a usable due date");
                false
            }
        })
        .collect()
}

fn pair_with_parent(
    items: Vec<ScheduledItem>,
    parent: &ParentSummary,
    display_name: Option<String>,
) -> Vec<DueEntry> {
    items
        .into_iter()
        .map(|item| DueEntry {
            item,
            parent: parent.clone(),
            display_name: display_name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ContractStatus, DueStatus, Group, Member, PlacementStatus},
        storage::MemoryStore,
    };
    use chrono::NaiveDate;

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .add_member(Member::new("m1", "Awa", "Ndiaye"))
            .add_group(Group::new("g1", "Tontine Espoir"))
            .add_contract(Contract::for_member(
                "c1",
                CaisseType::Standard,
                ContractStatus::Active,
                "m1",
            ))
            .add_contract(Contract::for_group(
                "c2",
                CaisseType::Libre,
                ContractStatus::LateWithPenalty,
                "g1",
            ))
            .add_contract(Contract::for_member(
                "c3",
                CaisseType::Standard,
                ContractStatus::Finished,
                "m1",
            ))
            .add_contract_payment(ScheduledItem::new("c1", 0, may(5), 10_000, DueStatus::Due))
            .add_contract_payment(ScheduledItem::new(
                "c1",
                1,
                NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
                10_000,
                DueStatus::Due,
            ))
            .add_contract_payment(ScheduledItem::new("c2", 0, may(31), 2_500, DueStatus::Paid))
            .add_contract_payment(ScheduledItem::new("c3", 0, may(5), 9_999, DueStatus::Due));
        store
    }

    #[test]
    fn keeps_active_like_parents_and_items_inside_month() {
        let store = store();
        let service = DueItemService::new(&store, 1);
        let outcome = service
            .contract_items(MonthWindow::containing(may(1)), &TypeFilter::all())
            .unwrap();
        let mut ids: Vec<_> = outcome.entries.iter().map(|e| e.item.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["c1-0", "c2-0"]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn resolves_member_and_group_names() {
        let store = store();
        let service = DueItemService::new(&store, 2);
        let outcome = service
            .contract_items(MonthWindow::containing(may(1)), &TypeFilter::all())
            .unwrap();
        let name_of = |id: &str| {
            outcome
                .entries
                .iter()
                .find(|entry| entry.item.id == id)
                .and_then(|entry| entry.display_name.clone())
        };
        assert_eq!(name_of("c1-0").as_deref(), Some("Awa Ndiaye"));
        assert_eq!(name_of("c2-0").as_deref(), Some("Tontine Espoir"));
    }

    #[test]
    fn type_filter_narrows_parents() {
        let store = store();
        let service = DueItemService::new(&store, 4);
        let outcome = service
            .contract_items(
                MonthWindow::containing(may(1)),
                &TypeFilter::only([CaisseType::Libre]),
            )
            .unwrap();
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].parent.id, "c2");
    }

    #[test]
    fn name_failure_keeps_items_without_display_name() {
        let mut store = store();
        store.fail_lookup_for("m1");
        let service = DueItemService::new(&store, 1);
        let outcome = service
            .contract_items(MonthWindow::containing(may(1)), &TypeFilter::all())
            .unwrap();
        let c1 = outcome
            .entries
            .iter()
            .find(|entry| entry.parent.id == "c1")
            .expect("c1 item kept");
        assert_eq!(c1.display_name, None);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].stage, FetchStage::DisplayName);
    }

    #[test]
    fn missing_member_is_reported_as_name_diagnostic() {
        let mut store = MemoryStore::new();
        store
            .add_contract(Contract::for_member(
                "c1",
                CaisseType::Standard,
                ContractStatus::Active,
                "ghost",
            ))
            .add_contract_payment(ScheduledItem::new("c1", 0, may(5), 1_000, DueStatus::Due));
        let outcome = DueItemService::new(&store, 1)
            .contract_items(MonthWindow::containing(may(1)), &TypeFilter::all())
            .unwrap();
        assert_eq!(outcome.entries.len(), 1);
        assert!(outcome.diagnostics[0].message.contains("ghost"));
    }

    #[test]
    fn blank_group_name_leaves_display_name_empty() {
        let mut store = MemoryStore::new();
        store
            .add_group(Group::new("g1", "   "))
            .add_contract(Contract::for_group(
                "c1",
                CaisseType::Libre,
                ContractStatus::Active,
                "g1",
            ))
            .add_contract_payment(ScheduledItem::new("c1", 0, may(5), 1_000, DueStatus::Due));
        let outcome = DueItemService::new(&store, 1)
            .contract_items(MonthWindow::containing(may(1)), &TypeFilter::all())
            .unwrap();
        assert_eq!(outcome.entries[0].display_name, None);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn placements_use_denormalised_benefactor_name() {
        let mut store = MemoryStore::new();
        store
            .add_placement(
                Placement::new(
                    "p1",
                    "b1",
                    PayoutMode::MonthlyCommissionFinalCapital,
                    PlacementStatus::Active,
                )
                .with_benefactor_name("Jean Mba"),
            )
            .add_placement(Placement::new(
                "p2",
                "b2",
                PayoutMode::MonthlyCommissionFinalCapital,
                PlacementStatus::Closed,
            ))
            .add_commission(ScheduledItem::new("p1", 0, may(15), 3_000, DueStatus::Partial))
            .add_commission(ScheduledItem::new("p2", 0, may(15), 3_000, DueStatus::Due))
            .fail_lookup_for("b1");
        let outcome = DueItemService::new(&store, 2)
            .commission_items(MonthWindow::containing(may(1)), &TypeFilter::all())
            .unwrap();
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].display_name.as_deref(), Some("Jean Mba"));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn undated_items_are_dropped() {
        let mut undated = ScheduledItem::new("c1", 7, may(5), 1_000, DueStatus::Due);
        undated.due_date = None;
        let kept = within_month(vec![undated], MonthWindow::containing(may(1)));
        assert!(kept.is_empty());
    }
}
