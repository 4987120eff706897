//! Daily logs: per-date totals for each duty category.

use std::collections::BTreeMap;

use jiff::{SignedDuration, civil::Date};
use serde::{Deserialize, Serialize};

use crate::hours;

use super::{DutyEvent, DutyStatus};

/// The four lines of a driver's daily log grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    OffDuty,
    SleeperBerth,
    Driving,
    OnDutyNotDriving,
}

impl LogCategory {
    pub const ALL: [Self; 4] = [
        Self::OffDuty,
        Self::SleeperBerth,
        Self::Driving,
        Self::OnDutyNotDriving,
    ];

    /// The category an event's time is logged under.
    pub fn of(event: &DutyEvent) -> Self {
        match event.status {
            DutyStatus::Driving => Self::Driving,
            DutyStatus::OnDuty => Self::OnDutyNotDriving,
            DutyStatus::SleeperBerth => Self::SleeperBerth,
            DutyStatus::OffDuty => match event.reason {
                Some(reason) if reason.is_rest() => Self::SleeperBerth,
                _ => Self::OffDuty,
            },
        }
    }
}

/// Hour totals for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: Date,

    #[serde(rename = "offDutyHours", with = "hours::as_hours")]
    pub off_duty: SignedDuration,

    #[serde(rename = "sleeperBerthHours", with = "hours::as_hours")]
    pub sleeper_berth: SignedDuration,

    #[serde(rename = "drivingHours", with = "hours::as_hours")]
    pub driving: SignedDuration,

    #[serde(rename = "onDutyNotDrivingHours", with = "hours::as_hours")]
    pub on_duty_not_driving: SignedDuration,
}

/// Daily logs keyed by date. Iteration is in date order.
pub type DailyLogs = BTreeMap<Date, DailyLog>;

impl DailyLog {
    /// An empty log for the given date.
    pub fn new(date: Date) -> Self {
        Self {
            date,
            off_duty: SignedDuration::ZERO,
            sleeper_berth: SignedDuration::ZERO,
            driving: SignedDuration::ZERO,
            on_duty_not_driving: SignedDuration::ZERO,
        }
    }

    pub fn add(&mut self, category: LogCategory, duration: SignedDuration) {
        *self.slot(category) += duration;
    }

    pub fn get(&self, category: LogCategory) -> SignedDuration {
        match category {
            LogCategory::OffDuty => self.off_duty,
            LogCategory::SleeperBerth => self.sleeper_berth,
            LogCategory::Driving => self.driving,
            LogCategory::OnDutyNotDriving => self.on_duty_not_driving,
        }
    }

    /// Sum of all four categories.
    pub fn total(&self) -> SignedDuration {
        LogCategory::ALL
            .into_iter()
            .fold(SignedDuration::ZERO, |acc, c| acc + self.get(c))
    }

    /// Time that counts against the cycle: driving plus other on-duty work.
    pub fn on_duty_total(&self) -> SignedDuration {
        self.driving + self.on_duty_not_driving
    }

    fn slot(&mut self, category: LogCategory) -> &mut SignedDuration {
        match category {
            LogCategory::OffDuty => &mut self.off_duty,
            LogCategory::SleeperBerth => &mut self.sleeper_berth,
            LogCategory::Driving => &mut self.driving,
            LogCategory::OnDutyNotDriving => &mut self.on_duty_not_driving,
        }
    }
}
