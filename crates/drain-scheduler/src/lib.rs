//! Drain Scheduler
//!
//! Periodically drains both intake queues, normalizes each envelope and
//! publishes the resulting records one at a time.

mod scheduler;

pub use scheduler::{CycleStats, DrainScheduler, SchedulerConfig};
