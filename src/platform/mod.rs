//! Platform abstraction layer
//!
//! Handles the host-facing plumbing the simulation needs:
//! - Time sources (wall clock or manually advanced)
//! - Cooperative scheduling of refresh callbacks and interval timers

pub mod scheduler;
pub mod time;

pub use scheduler::{Scheduler, TaskId, TaskKind};
pub use time::{Clock, ManualClock, SystemClock};
