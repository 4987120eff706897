//! Trip storage: trips, their daily logs, and logs recorded afterwards.

use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use jiff::{SignedDuration, civil::Date};
use rusqlite::Connection;
use uuid::Uuid;

use crate::hours;
use crate::model::{DailyLog, DailyLogs, Trip};

use super::{Result, Storage, StorageError};

const MAX_DAY: SignedDuration = SignedDuration::from_hours(24);

impl Storage {
    /// Creates a trip and its daily logs in a new `SQLite` file.
    ///
    /// Refuses the whole trip if any log holds more than 24 hours.
    pub fn create_trip(&self, trip: &Trip, logs: &DailyLogs) -> Result<()> {
        for log in logs.values() {
            check_day(log)?;
        }

        let mut conn = self.create_db(trip.id)?;
        if let Err(e) = insert_trip(&mut conn, trip, logs) {
            // Leave no half-written file behind: the id stays free for a retry.
            drop(conn);
            fs::remove_file(self.db_path(trip.id))?;
            return Err(e);
        }

        log::debug!("stored trip {} with {} daily logs", trip.id, logs.len());
        Ok(())
    }

    /// Records one day's log against a trip, replacing any log already
    /// stored for that date.
    ///
    /// Refuses a log that holds more than 24 hours.
    pub fn record_daily_log(&self, trip_id: Uuid, log: &DailyLog) -> Result<()> {
        check_day(log)?;
        let conn = self.open_db(trip_id)?;
        conn.execute(
            "INSERT INTO daily_log (date, off_duty_hours, sleeper_berth_hours,
                                    driving_hours, on_duty_not_driving_hours)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (date) DO UPDATE SET
                 off_duty_hours = excluded.off_duty_hours,
                 sleeper_berth_hours = excluded.sleeper_berth_hours,
                 driving_hours = excluded.driving_hours,
                 on_duty_not_driving_hours = excluded.on_duty_not_driving_hours",
            log_params(log),
        )?;
        log::debug!("recorded daily log for {} on trip {trip_id}", log.date);
        Ok(())
    }

    /// Loads a trip's log for one date.
    pub fn load_daily_log(&self, trip_id: Uuid, date: Date) -> Result<DailyLog> {
        let conn = self.open_db(trip_id)?;
        load_log_rows(&conn, date, date)?
            .remove(&date)
            .ok_or(StorageError::LogNotFound { trip_id, date })
    }

    /// Loads a single trip.
    pub fn load_trip(&self, id: Uuid) -> Result<Trip> {
        let conn = self.open_db(id)?;
        load_trip_row(&conn)
    }

    /// Loads a trip's daily logs, in date order.
    pub fn load_daily_logs(&self, id: Uuid) -> Result<DailyLogs> {
        let conn = self.open_db(id)?;
        load_log_rows(&conn, Date::MIN, Date::MAX)
    }

    /// Lists all trips by reading each `.sqlite` file in the storage root.
    ///
    /// Unreadable or malformed files are skipped.
    pub fn list_trips(&self) -> Result<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .db_paths()?
            .iter()
            .filter_map(|path| open_readable(path))
            .filter_map(|conn| load_trip_row(&conn).ok())
            .collect();
        trips.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(trips)
    }
}

/// Refuses a log whose categories sum to more than a day.
fn check_day(log: &DailyLog) -> Result<()> {
    if log.total() > MAX_DAY {
        return Err(StorageError::DayOverflow {
            date: log.date,
            total_hours: hours::to_hours(log.total()),
        });
    }
    Ok(())
}

/// Writes the trip row and its logs in one transaction.
fn insert_trip(conn: &mut Connection, trip: &Trip, logs: &DailyLogs) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO trip (id, driver, origin, pickup, dropoff, driving_hours,
                           cycle_hours_used, start_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            trip.id.to_string(),
            &trip.driver,
            &trip.origin,
            &trip.pickup,
            &trip.dropoff,
            trip.driving_hours,
            trip.cycle_hours_used,
            trip.start_date.to_string(),
            trip.created_at.to_string(),
        ],
    )?;
    for log in logs.values() {
        tx.execute(
            "INSERT INTO daily_log (date, off_duty_hours, sleeper_berth_hours,
                                    driving_hours, on_duty_not_driving_hours)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            log_params(log),
        )?;
    }
    tx.commit()?;
    Ok(())
}

/// Column values for a `daily_log` row, in schema order.
fn log_params(log: &DailyLog) -> (String, f64, f64, f64, f64) {
    (
        log.date.to_string(),
        hours::to_hours(log.off_duty),
        hours::to_hours(log.sleeper_berth),
        hours::to_hours(log.driving),
        hours::to_hours(log.on_duty_not_driving),
    )
}

/// Opens a database file, logging and skipping ones that fail.
pub(super) fn open_readable(path: &Path) -> Option<Connection> {
    match Connection::open(path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            log::warn!("skipping {}: {e}", path.display());
            None
        }
    }
}

/// Reads the single trip row from an open connection.
pub(super) fn load_trip_row(conn: &Connection) -> Result<Trip> {
    let (id, driver, origin, pickup, dropoff, driving_hours, cycle_hours_used, start, created) =
        conn.query_row(
            "SELECT id, driver, origin, pickup, dropoff, driving_hours, cycle_hours_used,
                    start_date, created_at
             FROM trip LIMIT 1",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, f64>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            },
        )?;

    Ok(Trip {
        id: parse_column("id", &id)?,
        driver,
        origin,
        pickup,
        dropoff,
        driving_hours,
        cycle_hours_used,
        start_date: parse_column("start_date", &start)?,
        created_at: parse_column("created_at", &created)?,
    })
}

/// Reads the daily log rows dated within `from..=to`.
pub(super) fn load_log_rows(conn: &Connection, from: Date, to: Date) -> Result<DailyLogs> {
    let mut stmt = conn.prepare(
        "SELECT date, off_duty_hours, sleeper_berth_hours, driving_hours,
                on_duty_not_driving_hours
         FROM daily_log WHERE date >= ?1 AND date <= ?2 ORDER BY date",
    )?;
    // ISO dates compare correctly as text.
    let rows = stmt.query_map(rusqlite::params![from.to_string(), to.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            [
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
            ],
        ))
    })?;

    let mut logs = DailyLogs::new();
    for row in rows {
        let (date, [off_duty, sleeper_berth, driving, on_duty_not_driving]) = row?;
        let date = parse_column("date", &date)?;
        let log = DailyLog {
            date,
            off_duty: duration_column("off_duty_hours", off_duty)?,
            sleeper_berth: duration_column("sleeper_berth_hours", sleeper_berth)?,
            driving: duration_column("driving_hours", driving)?,
            on_duty_not_driving: duration_column("on_duty_not_driving_hours", on_duty_not_driving)?,
        };
        logs.insert(date, log);
    }
    Ok(logs)
}

fn parse_column<T>(column: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| StorageError::Corrupt(format!("invalid {column}: {e}")))
}

fn duration_column(column: &str, value: f64) -> Result<SignedDuration> {
    hours::from_hours(value)
        .ok_or_else(|| StorageError::Corrupt(format!("invalid {column}: {value}")))
}
