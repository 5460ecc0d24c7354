use serde::{Deserialize, Serialize};

use crate::domain::common::Amount;

/// How a benefactor placement pays out its commissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMode {
    MonthlyCommissionFinalCapital,
    CapitalPlusCommissionsAtEnd,
}

impl PayoutMode {
    pub const ALL: [PayoutMode; 2] = [
        PayoutMode::MonthlyCommissionFinalCapital,
        PayoutMode::CapitalPlusCommissionsAtEnd,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PayoutMode::MonthlyCommissionFinalCapital => "monthly_commission_final_capital",
            PayoutMode::CapitalPlusCommissionsAtEnd => "capital_plus_commissions_at_end",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.label() == normalized)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Draft,
    Active,
    EarlyExit,
    Closed,
    Canceled,
}

impl PlacementStatus {
    pub fn is_active_like(self) -> bool {
        match self {
            PlacementStatus::Active => true,
            PlacementStatus::Draft
            | PlacementStatus::EarlyExit
            | PlacementStatus::Closed
            | PlacementStatus::Canceled => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    pub id: String,
    pub benefactor_id: String,
    /// Denormalised at placement creation; no lookup needed.
    #[serde(default)]
    pub benefactor_name: Option<String>,
    pub payout_mode: PayoutMode,
    pub status: PlacementStatus,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default)]
    pub rate_percent: f64,
    #[serde(default)]
    pub period_months: u32,
}

impl Placement {
    pub fn new(
        id: impl Into<String>,
        benefactor_id: impl Into<String>,
        payout_mode: PayoutMode,
        status: PlacementStatus,
    ) -> Self {
        Self {
            id: id.into(),
            benefactor_id: benefactor_id.into(),
            benefactor_name: None,
            payout_mode,
            status,
            amount: 0,
            rate_percent: 0.0,
            period_months: 0,
        }
    }

    pub fn with_benefactor_name(mut self, name: impl Into<String>) -> Self {
        self.benefactor_name = Some(name.into());
        self
    }
}
