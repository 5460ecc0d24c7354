pub mod calendar;
pub mod common;
pub mod contract;
pub mod member;
pub mod placement;
pub mod schedule;

pub use calendar::{
    CalendarColor, CalendarReport, ColoredItem, DayBucket, DueEntry, FetchDiagnostic, FetchStage,
    MonthSummary, MonthWindow, ParentKind, ParentSummary, TypeFilter, TypeTag,
};
pub use common::{Amount, Displayable, Identifiable};
pub use contract::{CaisseType, Contract, ContractHolder, ContractStatus};
pub use member::{Group, Member};
pub use placement::{PayoutMode, Placement, PlacementStatus};
pub use schedule::{DueStatus, ScheduledItem};
