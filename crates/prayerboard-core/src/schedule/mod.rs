mod entry;
mod store;
pub mod table;

pub use entry::{parse_date, ScheduleEntry, DATE_FORMAT, PLACEHOLDER_TEXT};
pub use store::ScheduleStore;
pub use table::{read_schedule, write_schedule, COLUMNS};
