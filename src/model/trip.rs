//! Trip types: one planned haul from pickup to dropoff.

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A planned trip and the inputs its duty cycle was simulated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub driver: String,

    /// Where the driver is when the trip is planned.
    pub origin: String,
    pub pickup: String,
    pub dropoff: String,

    /// Planned driving time for the whole trip.
    pub driving_hours: f64,

    /// On-duty hours already used in the rolling cycle when planned.
    pub cycle_hours_used: f64,

    /// The date the trip's logs start on.
    pub start_date: Date,
    pub created_at: Timestamp,
}
