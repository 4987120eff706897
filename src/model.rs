//! Core data model for Haul.
//!
//! Duty events come out of the simulator, daily logs out of the partitioner,
//! and trips tie both to the inputs they were planned from.

mod daily_log;
mod event;
mod trip;

pub use daily_log::{DailyLog, DailyLogs, LogCategory};
pub use event::{DutyEvent, DutyReason, DutyStatus};
pub use trip::Trip;
