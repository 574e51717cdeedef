pub mod engine;
pub mod scheduler;

pub use engine::{TickOutcome, TimerEngine, TimerSnapshot, TimerStatus};
pub use scheduler::{IntervalScheduler, TickId, TickScheduler};
