pub mod clock;
pub mod coursework_builder;
pub mod orchestrator;
pub mod schedule_resolver;

pub use clock::{Clock, FixedClock, SystemClock};
pub use orchestrator::{Orchestrator, Plan, SubmissionStats};
pub use schedule_resolver::{ResolvedSlot, resolve_slot};
