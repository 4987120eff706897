//! Local persistence for trips and their daily logs.
//!
//! Each trip lives in its own `SQLite` file under the storage root:
//!
//! ```text
//! <root>/<uuid>.sqlite
//!   trip        # One row: the trip and the inputs it was planned from
//!   daily_log   # One row per calendar date
//! ```

mod cycle;
mod trip;

use std::{fs, io, path::PathBuf};

use jiff::civil::Date;
use rusqlite::Connection;
use uuid::Uuid;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("trip not found: {0}")]
    TripNotFound(Uuid),

    #[error("trip already exists: {0}")]
    TripAlreadyExists(Uuid),

    #[error("no daily log for {date} on trip {trip_id}")]
    LogNotFound { trip_id: Uuid, date: Date },

    #[error("daily log for {date} totals {total_hours:.2}h, more than 24")]
    DayOverflow { date: Date, total_hours: f64 },

    #[error("corrupt trip data: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "
    CREATE TABLE trip (
        id TEXT PRIMARY KEY,
        driver TEXT NOT NULL,
        origin TEXT NOT NULL,
        pickup TEXT NOT NULL,
        dropoff TEXT NOT NULL,
        driving_hours REAL NOT NULL,
        cycle_hours_used REAL NOT NULL,
        start_date TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE TABLE daily_log (
        date TEXT PRIMARY KEY,
        off_duty_hours REAL NOT NULL,
        sleeper_berth_hours REAL NOT NULL,
        driving_hours REAL NOT NULL,
        on_duty_not_driving_hours REAL NOT NULL
    );
";

/// Local file-based storage for trips.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.haul/trips/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".haul").join("trips"))
    }

    fn db_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.sqlite"))
    }

    /// Creates a fresh database file for a trip and applies the schema.
    fn create_db(&self, id: Uuid) -> Result<Connection> {
        let path = self.db_path(id);
        if path.exists() {
            return Err(StorageError::TripAlreadyExists(id));
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        log::debug!("created {}", path.display());
        Ok(conn)
    }

    /// Opens an existing trip database.
    fn open_db(&self, id: Uuid) -> Result<Connection> {
        let path = self.db_path(id);
        if !path.exists() {
            return Err(StorageError::TripNotFound(id));
        }
        Ok(Connection::open(path)?)
    }

    /// Paths of every trip database under the root.
    fn db_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("sqlite") {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
