//! Cycle recap: on-duty hours a driver has used in the rolling window.

use jiff::{SignedDuration, ToSpan, civil::Date};

use crate::hours;
use crate::simulate::CYCLE_LIMIT;

use super::trip::{load_log_rows, load_trip_row, open_readable};
use super::{Result, Storage};

impl Storage {
    /// Sums the driver's on-duty hours dated within the `days` days ending on `on`.
    ///
    /// Driving and on-duty-not-driving time count; off-duty and sleeper berth
    /// don't. The result is capped at the 70-hour cycle limit.
    pub fn cycle_hours_used(&self, driver: &str, on: Date, days: u8) -> Result<f64> {
        let from = on.saturating_sub(i64::from(days.saturating_sub(1)).days());
        let mut used = SignedDuration::ZERO;

        for path in self.db_paths()? {
            let Some(conn) = open_readable(&path) else {
                continue;
            };
            let Ok(trip) = load_trip_row(&conn) else {
                continue;
            };
            if trip.driver != driver {
                continue;
            }
            for log in load_log_rows(&conn, from, on)?.values() {
                used += log.on_duty_total();
            }
        }

        log::debug!("{driver} used {used:?} on duty from {from} through {on}");
        Ok(hours::to_hours(used.min(CYCLE_LIMIT)))
    }
}
