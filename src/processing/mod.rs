//! Sensor update processing: rate limiting and jitter rejection

pub mod scheduler;
pub mod movement;

pub use scheduler::{Clock, ManualClock, SchedulerStats, SystemClock, UpdateScheduler};
pub use movement::MovementFilter;
