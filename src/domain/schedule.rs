use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{lenient_day, Amount};

/// Lifecycle of a scheduled payment or commission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Due,
    Paid,
    /// Only produced for placement commissions.
    Partial,
    Refused,
    Canceled,
}

impl DueStatus {
    /// Due and partially settled items still carry an outstanding obligation.
    pub fn is_outstanding(self) -> bool {
        matches!(self, DueStatus::Due | DueStatus::Partial)
    }

    pub fn is_void(self) -> bool {
        matches!(self, DueStatus::Refused | DueStatus::Canceled)
    }

    pub fn label(self) -> &'static str {
        match self {
            DueStatus::Due => "due",
            DueStatus::Paid => "paid",
            DueStatus::Partial => "partial",
            DueStatus::Refused => "refused",
            DueStatus::Canceled => "canceled",
        }
    }
}

/// An amount owed on a calendar date, owned by a contract or a placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledItem {
    pub id: String,
    pub parent_id: String,
    /// Position of the item in its parent's schedule, starting at 0.
    pub index: u32,
    #[serde(default, with = "lenient_day")]
    pub due_date: Option<NaiveDate>,
    pub amount: Amount,
    pub status: DueStatus,
}

impl ScheduledItem {
    pub fn new(
        parent_id: impl Into<String>,
        index: u32,
        due_date: NaiveDate,
        amount: Amount,
        status: DueStatus,
    ) -> Self {
        let parent_id = parent_id.into();
        Self {
            id: format!("{}-{}", parent_id, index),
            parent_id,
            index,
            due_date: Some(due_date),
            amount,
            status,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == DueStatus::Paid
    }
}
