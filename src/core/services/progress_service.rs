use chrono::NaiveDate;

use crate::domain::{Amount, ScheduledItem};

/// Payment progress helpers over one parent's schedule.
pub struct ProgressService;

impl ProgressService {
    pub fn paid_total(items: &[ScheduledItem]) -> Amount {
        items
            .iter()
            .filter(|item| item.is_paid())
            .map(|item| item.amount)
            .sum()
    }

    /// Amount still owed: due and partial items only, void items excluded.
    pub fn remaining_total(items: &[ScheduledItem]) -> Amount {
        items
            .iter()
            .filter(|item| item.status.is_outstanding())
            .map(|item| item.amount)
            .sum()
    }

    /// Share of the owed amount already paid, in percent.
    pub fn progress_percent(items: &[ScheduledItem]) -> Option<f64> {
        let paid = Self::paid_total(items);
        let owed = paid + Self::remaining_total(items);
        if owed == 0 {
            None
        } else {
            Some(paid as f64 / owed as f64 * 100.0)
        }
    }

    /// Earliest outstanding item due today or later.
    pub fn next_due(items: &[ScheduledItem], today: NaiveDate) -> Option<&ScheduledItem> {
        items
            .iter()
            .filter(|item| item.status.is_outstanding())
            .filter(|item| item.due_date.map_or(false, |due| due >= today))
            .min_by_key(|item| (item.due_date, item.index))
    }

    /// Outstanding items whose due date has passed, oldest first.
    pub fn overdue(items: &[ScheduledItem], today: NaiveDate) -> Vec<&ScheduledItem> {
        let mut overdue: Vec<_> = items
            .iter()
            .filter(|item| item.status.is_outstanding())
            .filter(|item| item.due_date.map_or(false, |due| due < today))
            .collect();
        overdue.sort_by_key(|item| (item.due_date, item.index));
        overdue
    }
}
