//! Output formatting for CLI display.

use serde::Serialize;

use crate::model::{DailyLog, DailyLogs, DutyEvent, DutyStatus, Trip};

/// Machine-readable plan: the events and the logs they partition into.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlanReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<&'a Trip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<&'a [DutyEvent]>,
    pub daily_logs: Vec<&'a DailyLog>,
}

fn status_label(status: DutyStatus) -> &'static str {
    match status {
        DutyStatus::Driving => "driving",
        DutyStatus::OnDuty => "on duty",
        DutyStatus::OffDuty => "off duty",
        DutyStatus::SleeperBerth => "sleeper berth",
    }
}

/// One event per line: status, hours, and reason if any.
pub(super) fn format_event(event: &DutyEvent) -> String {
    let line = format!("{:<13} {:>6.2}h", status_label(event.status), event.hours());
    match event.reason {
        Some(reason) => format!("{line}  {reason}"),
        None => line,
    }
}

/// One log per line: date and the four category totals.
pub(super) fn format_daily_log(log: &DailyLog) -> String {
    let h = crate::hours::to_hours;
    format!(
        "{}  off {:>5.2}  sleeper {:>5.2}  driving {:>5.2}  on duty {:>5.2}",
        log.date,
        h(log.off_duty),
        h(log.sleeper_berth),
        h(log.driving),
        h(log.on_duty_not_driving),
    )
}

pub(super) fn format_daily_logs(logs: &DailyLogs) -> String {
    if logs.is_empty() {
        return "No daily logs".to_string();
    }
    logs.values()
        .map(format_daily_log)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short one-line trip summary for listings.
pub(super) fn format_trip_line(trip: &Trip) -> String {
    let short_id = &trip.id.to_string()[..8];
    format!(
        "{short_id}  {}  [{}]  {} → {} ({:.1}h driving)",
        trip.start_date, trip.driver, trip.pickup, trip.dropoff, trip.driving_hours
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::{SignedDuration, Timestamp, civil::date};
    use uuid::Uuid;

    use crate::model::{DutyReason, LogCategory};

    #[test]
    fn format_event_with_reason() {
        let event = DutyEvent::off_duty(SignedDuration::from_mins(30), DutyReason::ShortBreak);
        assert_eq!(format_event(&event), "off duty        0.50h  30-min break");
    }

    #[test]
    fn format_driving_event() {
        let event = DutyEvent::driving(SignedDuration::from_hours(8));
        assert_eq!(format_event(&event), "driving         8.00h");
    }

    #[test]
    fn format_log_line() {
        let mut log = DailyLog::new(date(2025, 4, 7));
        log.add(LogCategory::Driving, SignedDuration::from_hours(11));
        log.add(LogCategory::SleeperBerth, SignedDuration::from_mins(690));
        assert_eq!(
            format_daily_log(&log),
            "2025-04-07  off  0.00  sleeper 11.50  driving 11.00  on duty  0.00"
        );
    }

    #[test]
    fn format_no_logs() {
        assert_eq!(format_daily_logs(&DailyLogs::new()), "No daily logs");
    }

    #[test]
    fn format_trip_summary() {
        let trip = Trip {
            id: Uuid::parse_str("a3b0fc12-0000-4000-8000-000000000000").unwrap(),
            driver: "casey".into(),
            origin: "Reno, NV".into(),
            pickup: "Sacramento, CA".into(),
            dropoff: "Denver, CO".into(),
            driving_hours: 18.5,
            cycle_hours_used: 0.0,
            start_date: date(2025, 4, 7),
            created_at: Timestamp::UNIX_EPOCH,
        };
        assert_eq!(
            format_trip_line(&trip),
            "a3b0fc12  2025-04-07  [casey]  Sacramento, CA → Denver, CO (18.5h driving)"
        );
    }
}
