//! Duty events: the simulator's output.

use std::fmt;

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::hours;

/// A driver's duty status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyStatus {
    Driving,

    /// On duty, not driving: loading, unloading, paperwork.
    OnDuty,

    OffDuty,

    /// Resting in the sleeper berth.
    ///
    /// The simulator records its rests as `OffDuty` with a reason; this
    /// status exists for events supplied by other sources.
    #[serde(rename = "SLEEPER")]
    SleeperBerth,
}

/// Why an event was scheduled.
///
/// Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutyReason {
    Pickup,
    Dropoff,

    /// The 10-hour off-duty reset that starts a new shift.
    #[serde(rename = "10-hour reset")]
    FullReset,

    /// An 8-hour sleeper-berth rest.
    #[serde(rename = "Sleeper Berth")]
    SleeperBerth,

    /// The 30-minute break owed after 8 hours of driving.
    #[serde(rename = "30-min break")]
    ShortBreak,
}

impl DutyReason {
    /// Whether time spent for this reason is logged as sleeper berth.
    pub fn is_rest(self) -> bool {
        matches!(self, Self::FullReset | Self::SleeperBerth)
    }
}

impl fmt::Display for DutyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pickup => "Pickup",
            Self::Dropoff => "Dropoff",
            Self::FullReset => "10-hour reset",
            Self::SleeperBerth => "Sleeper Berth",
            Self::ShortBreak => "30-min break",
        };
        f.write_str(label)
    }
}

/// One contiguous block of time in a single duty status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyEvent {
    pub status: DutyStatus,

    #[serde(rename = "durationHours", with = "hours::as_hours")]
    pub duration: SignedDuration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DutyReason>,
}

impl DutyEvent {
    pub fn driving(duration: SignedDuration) -> Self {
        Self {
            status: DutyStatus::Driving,
            duration,
            reason: None,
        }
    }

    pub fn on_duty(duration: SignedDuration, reason: DutyReason) -> Self {
        Self {
            status: DutyStatus::OnDuty,
            duration,
            reason: Some(reason),
        }
    }

    pub fn off_duty(duration: SignedDuration, reason: DutyReason) -> Self {
        Self {
            status: DutyStatus::OffDuty,
            duration,
            reason: Some(reason),
        }
    }

    /// The event's duration in fractional hours.
    pub fn hours(&self) -> f64 {
        hours::to_hours(self.duration)
    }
}
