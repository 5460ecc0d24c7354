use chrono::NaiveDate;

use crate::{
    config::Config,
    domain::{CaisseType, CalendarReport, MonthWindow, PayoutMode, TypeFilter},
    storage::DocumentStore,
};

use super::{DayAggregator, DueItemService, FetchOutcome, ServiceResult};

/// Builds the colored due calendar for contracts or placements.
///
/// Constructed per query; holds no state between calls.
pub struct DueCalendarService<'a, S: DocumentStore + ?Sized> {
    items: DueItemService<'a, S>,
}

impl<'a, S: DocumentStore + ?Sized> DueCalendarService<'a, S> {
    pub fn new(store: &'a S, config: &Config) -> Self {
        Self {
            items: DueItemService::new(store, config.effective_concurrency()),
        }
    }

    /// Contract payments due in the month containing `month`.
    pub fn contract_calendar(
        &self,
        month: NaiveDate,
        filter: &TypeFilter<CaisseType>,
        today: NaiveDate,
    ) -> ServiceResult<CalendarReport> {
        let window = MonthWindow::containing(month);
        let outcome = self.items.contract_items(window, filter)?;
        Ok(Self::report(window, outcome, today))
    }

    /// Placement commissions due in the month containing `month`.
    pub fn commission_calendar(
        &self,
        month: NaiveDate,
        filter: &TypeFilter<PayoutMode>,
        today: NaiveDate,
    ) -> ServiceResult<CalendarReport> {
        let window = MonthWindow::containing(month);
        let outcome = self.items.commission_items(window, filter)?;
        Ok(Self::report(window, outcome, today))
    }

    fn report(month: MonthWindow, outcome: FetchOutcome, today: NaiveDate) -> CalendarReport {
        CalendarReport {
            month,
            days: DayAggregator::aggregate(outcome.entries, today),
            diagnostics: outcome.diagnostics,
        }
    }
}
