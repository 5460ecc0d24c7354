use std::collections::HashSet;

use crate::{
    domain::{Contract, Group, Identifiable, Member, Placement, ScheduledItem},
    errors::KaraError,
};

use super::{DocumentStore, Result, StoreSnapshot};

/// In-process document store with optional failure injection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: StoreSnapshot,
    failing_item_parents: HashSet<String>,
    failing_lookups: HashSet<String>,
    failing_listing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    pub fn add_contract(&mut self, contract: Contract) -> &mut Self {
        self.snapshot.contracts.push(contract);
        self
    }

    pub fn add_contract_payment(&mut self, item: ScheduledItem) -> &mut Self {
        self.snapshot.contract_payments.push(item);
        self
    }

    pub fn add_placement(&mut self, placement: Placement) -> &mut Self {
        self.snapshot.placements.push(placement);
        self
    }

    pub fn add_commission(&mut self, item: ScheduledItem) -> &mut Self {
        self.snapshot.commissions.push(item);
        self
    }

    pub fn add_member(&mut self, member: Member) -> &mut Self {
        self.snapshot.members.push(member);
        self
    }

    pub fn add_group(&mut self, group: Group) -> &mut Self {
        self.snapshot.groups.push(group);
        self
    }

    /// Makes item listing fail for the given contract or placement.
    pub fn fail_items_for(&mut self, parent_id: impl Into<String>) -> &mut Self {
        self.failing_item_parents.insert(parent_id.into());
        self
    }

    /// Makes member/group resolution fail for the given id.
    pub fn fail_lookup_for(&mut self, id: impl Into<String>) -> &mut Self {
        self.failing_lookups.insert(id.into());
        self
    }

    /// Makes every parent listing fail.
    pub fn fail_listing(&mut self) -> &mut Self {
        self.failing_listing = true;
        self
    }

    fn check_listing(&self, collection: &str) -> Result<()> {
        if self.failing_listing {
            return Err(KaraError::Storage(format!(
                "listing `{collection}` is unavailable"
            )));
        }
        Ok(())
    }

    fn items_of(&self, items: &[ScheduledItem], parent_id: &str) -> Result<Vec<ScheduledItem>> {
        if self.failing_item_parents.contains(parent_id) {
            return Err(KaraError::Storage(format!(
                "items of `{parent_id}` are unavailable"
            )));
        }
        Ok(items
            .iter()
            .filter(|item| item.parent_id == parent_id)
            .cloned()
            .collect())
    }

    fn check_lookup(&self, id: &str) -> Result<()> {
        if self.failing_lookups.contains(id) {
            return Err(KaraError::Storage(format!("lookup of `{id}` is unavailable")));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn list_contracts(&self) -> Result<Vec<Contract>> {
        self.check_listing("contracts")?;
        Ok(self.snapshot.contracts.clone())
    }

    fn list_contract_payments(&self, contract_id: &str) -> Result<Vec<ScheduledItem>> {
        self.items_of(&self.snapshot.contract_payments, contract_id)
    }

    fn list_placements(&self) -> Result<Vec<Placement>> {
        self.check_listing("placements")?;
        Ok(self.snapshot.placements.clone())
    }

    fn list_commissions(&self, placement_id: &str) -> Result<Vec<ScheduledItem>> {
        self.items_of(&self.snapshot.commissions, placement_id)
    }

    fn member(&self, id: &str) -> Result<Option<Member>> {
        self.check_lookup(id)?;
        Ok(find_by_id(&self.snapshot.members, id))
    }

    fn group(&self, id: &str) -> Result<Option<Group>> {
        self.check_lookup(id)?;
        Ok(find_by_id(&self.snapshot.groups, id))
    }
}

fn find_by_id<T: Identifiable + Clone>(documents: &[T], id: &str) -> Option<T> {
    documents.iter().find(|document| document.id() == id).cloned()
}
