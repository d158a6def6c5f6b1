pub mod catalog;
pub mod coursework;
pub mod schedule;

pub use catalog::CacheEntry;
pub use coursework::{CourseworkCatalog, CourseworkDefinition, DueTimeSpec};
pub use schedule::{DayEntry, Schedule, ScheduleFile};
