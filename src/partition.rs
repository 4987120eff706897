//! Daily log partitioning: anchor duty events to the calendar.
//!
//! Events are laid end to end from midnight of the start date. An event that
//! crosses midnight is split, each piece landing in its own day's log.

use jiff::{SignedDuration, civil::Date};

use crate::model::{DailyLog, DailyLogs, DutyEvent, LogCategory};

const DAY: SignedDuration = SignedDuration::from_hours(24);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PartitionError {
    #[error("events run past the last representable date after {0}")]
    DateOutOfRange(Date),
}

/// Splits events into per-date logs, starting at midnight of `start`.
///
/// Logs exist only for dates that received time. Durations are preserved
/// exactly and no log holds more than 24 hours.
pub fn partition(events: &[DutyEvent], start: Date) -> Result<DailyLogs, PartitionError> {
    let mut logs = DailyLogs::new();
    let mut today = start;
    let mut elapsed_today = SignedDuration::ZERO;

    for event in events {
        let category = LogCategory::of(event);
        let mut left = event.duration;

        while left.is_positive() {
            if elapsed_today >= DAY {
                today = today
                    .tomorrow()
                    .map_err(|_| PartitionError::DateOutOfRange(today))?;
                elapsed_today = SignedDuration::ZERO;
            }

            let piece = left.min(DAY - elapsed_today);
            logs.entry(today)
                .or_insert_with(|| DailyLog::new(today))
                .add(category, piece);
            left -= piece;
            elapsed_today += piece;
        }
    }

    log::debug!("partitioned {} events into {} daily logs", events.len(), logs.len());
    Ok(logs)
}
