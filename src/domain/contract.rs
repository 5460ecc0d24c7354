use serde::{Deserialize, Serialize};

use crate::domain::common::Amount;

/// Kind of "caisse spéciale" savings contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CaisseType {
    Standard,
    Journaliere,
    Libre,
}

impl CaisseType {
    pub const ALL: [CaisseType; 3] = [
        CaisseType::Standard,
        CaisseType::Journaliere,
        CaisseType::Libre,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CaisseType::Standard => "standard",
            CaisseType::Journaliere => "journaliere",
            CaisseType::Libre => "libre",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == normalized)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Active,
    LateNoPenalty,
    LateWithPenalty,
    Finished,
    Closed,
    Rescinded,
}

impl ContractStatus {
    /// Statuses whose scheduled payments belong on the due calendar.
    pub fn is_active_like(self) -> bool {
        match self {
            ContractStatus::Active
            | ContractStatus::LateNoPenalty
            | ContractStatus::LateWithPenalty => true,
            ContractStatus::Draft
            | ContractStatus::Finished
            | ContractStatus::Closed
            | ContractStatus::Rescinded => false,
        }
    }
}

/// Who subscribed the contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractHolder {
    Member { member_id: String },
    Group { group_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contract {
    pub id: String,
    pub caisse_type: CaisseType,
    pub status: ContractStatus,
    pub holder: ContractHolder,
    #[serde(default)]
    pub monthly_amount: Amount,
    #[serde(default)]
    pub months_planned: u32,
}

impl Contract {
    pub fn new(
        id: impl Into<String>,
        caisse_type: CaisseType,
        status: ContractStatus,
        holder: ContractHolder,
    ) -> Self {
        Self {
            id: id.into(),
            caisse_type,
            status,
            holder,
            monthly_amount: 0,
            months_planned: 0,
        }
    }

    pub fn for_member(
        id: impl Into<String>,
        caisse_type: CaisseType,
        status: ContractStatus,
        member_id: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            caisse_type,
            status,
            ContractHolder::Member {
                member_id: member_id.into(),
            },
        )
    }

    pub fn for_group(
        id: impl Into<String>,
        caisse_type: CaisseType,
        status: ContractStatus,
        group_id: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            caisse_type,
            status,
            ContractHolder::Group {
                group_id: group_id.into(),
            },
        )
    }
}
