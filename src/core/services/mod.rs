pub mod calendar_service;
pub mod day_aggregator;
pub mod due_item_service;
pub mod progress_service;

pub use calendar_service::DueCalendarService;
pub use day_aggregator::{DayAggregator, Urgency, IMMINENT_DAYS};
pub use due_item_service::{DueItemService, FetchOutcome};
pub use progress_service::ProgressService;

use crate::errors::KaraError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] KaraError),
}
