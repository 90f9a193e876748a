//! Pure domain models: farmers, collection entries, centers and derived summaries.
//! No I/O lives here.

pub mod center;
pub mod common;
pub mod entry;
pub mod farmer;
pub mod period;
pub mod statement;

pub use center::{CenterInput, DairyCenter, Role, UserProfile};
pub use common::{short_id, CenterScoped, Displayable, Identifiable, NamedEntity};
pub use entry::{CollectionEntry, EntryDraft, EntryFilter, NewEntry, Session};
pub use farmer::{Farmer, FarmerInput};
pub use period::{month_name, DateRange, MonthPeriod};
pub use statement::{DailySummary, FarmerTotals, MonthlyStatement, PeriodSummary};
