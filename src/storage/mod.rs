pub mod json_backend;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Contract, Group, Member, Placement, ScheduledItem},
    errors::KaraError,
};

pub type Result<T> = std::result::Result<T, KaraError>;

/// Read access to the document collections the due calendar consumes.
///
/// Each call is one round-trip to the backing store; callers fan out per
/// parent and decide which failures are fatal.
pub trait DocumentStore: Send + Sync {
    fn list_contracts(&self) -> Result<Vec<Contract>>;
    fn list_contract_payments(&self, contract_id: &str) -> Result<Vec<ScheduledItem>>;
    fn list_placements(&self) -> Result<Vec<Placement>>;
    fn list_commissions(&self, placement_id: &str) -> Result<Vec<ScheduledItem>>;
    fn member(&self, id: &str) -> Result<Option<Member>>;
    fn group(&self, id: &str) -> Result<Option<Group>>;
}

/// Serializable image of every collection, as exported from the document store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub contract_payments: Vec<ScheduledItem>,
    #[serde(default)]
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub commissions: Vec<ScheduledItem>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
