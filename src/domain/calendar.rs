use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        common::Amount,
        contract::CaisseType,
        placement::PayoutMode,
        schedule::{DueStatus, ScheduledItem},
    },
    errors::KaraError,
};

/// Canonical day key used to bucket items, e.g. `2024-05-05`.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start, end]` range covering one calendar month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Window of the month containing `anchor`.
    pub fn containing(anchor: NaiveDate) -> Self {
        let start = anchor - Duration::days(anchor.day0() as i64);
        let probe = start + Duration::days(32);
        let next_start = probe - Duration::days(probe.day0() as i64);
        Self {
            start,
            end: next_start - Duration::days(1),
        }
    }

    /// Parses `YYYY-MM` (or any full `YYYY-MM-DD` inside the month).
    pub fn parse(raw: &str) -> Result<Self, KaraError> {
        let raw = raw.trim();
        let anchor = NaiveDate::parse_from_str(raw, DAY_KEY_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), DAY_KEY_FORMAT))
            .map_err(|_| KaraError::InvalidInput(format!("`{raw}` is not a YYYY-MM month")))?;
        Ok(Self::containing(anchor))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> u32 {
        self.end.day()
    }

    pub fn label(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }
}

/// Filter tag carried by a parent record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypeTag {
    Caisse(CaisseType),
    Payout(PayoutMode),
}

impl TypeTag {
    pub fn label(self) -> &'static str {
        match self {
            TypeTag::Caisse(kind) => kind.label(),
            TypeTag::Payout(mode) => mode.label(),
        }
    }
}

/// Set of allowed type tags. An empty filter admits everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter<T: Ord> {
    allowed: BTreeSet<T>,
}

impl<T: Ord> Default for TypeFilter<T> {
    fn default() -> Self {
        Self {
            allowed: BTreeSet::new(),
        }
    }
}

impl<T: Ord> TypeFilter<T> {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(tags: impl IntoIterator<Item = T>) -> Self {
        Self {
            allowed: tags.into_iter().collect(),
        }
    }

    pub fn allows(&self, tag: &T) -> bool {
        self.allowed.is_empty() || self.allowed.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Contract,
    Placement,
}

impl ParentKind {
    pub fn label(self) -> &'static str {
        match self {
            ParentKind::Contract => "contract",
            ParentKind::Placement => "placement",
        }
    }
}

/// The slice of parent metadata the calendar needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParentSummary {
    pub id: String,
    pub kind: ParentKind,
    pub type_tag: TypeTag,
}

/// A scheduled item paired with its parent and resolved owner name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DueEntry {
    pub item: ScheduledItem,
    pub parent: ParentSummary,
    pub display_name: Option<String>,
}

/// Traffic-light tag rendered on items and calendar cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CalendarColor {
    Green,
    Orange,
    Yellow,
    Red,
    Gray,
}

impl CalendarColor {
    pub const ALL: [CalendarColor; 5] = [
        CalendarColor::Red,
        CalendarColor::Orange,
        CalendarColor::Yellow,
        CalendarColor::Green,
        CalendarColor::Gray,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CalendarColor::Green => "green",
            CalendarColor::Orange => "orange",
            CalendarColor::Yellow => "yellow",
            CalendarColor::Red => "red",
            CalendarColor::Gray => "gray",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColoredItem {
    pub item: ScheduledItem,
    pub parent: ParentSummary,
    pub display_name: Option<String>,
    pub color: CalendarColor,
}

/// All items due on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub items: Vec<ColoredItem>,
    pub total_amount: Amount,
    pub paid_amount: Amount,
    pub remaining_amount: Amount,
    pub count: usize,
    pub statuses: BTreeSet<DueStatus>,
    /// Distinct parent tags in first-seen order.
    pub type_tags: Vec<TypeTag>,
    pub color: CalendarColor,
}

impl DayBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            items: Vec::new(),
            total_amount: 0,
            paid_amount: 0,
            remaining_amount: 0,
            count: 0,
            statuses: BTreeSet::new(),
            type_tags: Vec::new(),
            color: CalendarColor::Gray,
        }
    }

    pub fn key(&self) -> String {
        self.date.format(DAY_KEY_FORMAT).to_string()
    }
}

/// Fetch stage at which a per-parent failure occurred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchStage {
    Items,
    DisplayName,
}

/// A recovered per-parent failure reported alongside the buckets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchDiagnostic {
    pub parent_id: String,
    pub parent_kind: ParentKind,
    pub stage: FetchStage,
    pub message: String,
}

/// Result of one calendar query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarReport {
    pub month: MonthWindow,
    pub days: Vec<DayBucket>,
    pub diagnostics: Vec<FetchDiagnostic>,
}

impl CalendarReport {
    pub fn bucket(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days
            .binary_search_by(|bucket| bucket.date.cmp(&date))
            .ok()
            .map(|idx| &self.days[idx])
    }

    pub fn is_partial(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn summary(&self) -> MonthSummary {
        let mut summary = MonthSummary::default();
        for bucket in &self.days {
            summary.total_amount = summary.total_amount.saturating_add(bucket.total_amount);
            summary.paid_amount = summary.paid_amount.saturating_add(bucket.paid_amount);
            summary.remaining_amount = summary
                .remaining_amount
                .saturating_add(bucket.remaining_amount);
            summary.item_count += bucket.count;
            match bucket.color {
                CalendarColor::Red => summary.red_days += 1,
                CalendarColor::Orange => summary.orange_days += 1,
                CalendarColor::Yellow => summary.yellow_days += 1,
                CalendarColor::Green => summary.green_days += 1,
                CalendarColor::Gray => summary.gray_days += 1,
            }
        }
        summary
    }
}

/// Month-level totals shown under the calendar grid.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthSummary {
    pub total_amount: Amount,
    pub paid_amount: Amount,
    pub remaining_amount: Amount,
    pub item_count: usize,
    pub red_days: usize,
    pub orange_days: usize,
    pub yellow_days: usize,
    pub green_days: usize,
    pub gray_days: usize,
}

impl MonthSummary {
    pub fn days_with(&self, color: CalendarColor) -> usize {
        match color {
            CalendarColor::Red => self.red_days,
            CalendarColor::Orange => self.orange_days,
            CalendarColor::Yellow => self.yellow_days,
            CalendarColor::Green => self.green_days,
            CalendarColor::Gray => self.gray_days,
        }
    }
}
