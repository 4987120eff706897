//! Conversions between fractional hours and exact durations.
//!
//! Inputs and outputs speak hours as `f64`. Internally every duration is a
//! [`SignedDuration`] so that splitting and summing never drifts.

use jiff::SignedDuration;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Converts fractional hours into an exact duration.
///
/// Returns `None` for negative, non-finite, or out-of-range values.
pub fn from_hours(hours: f64) -> Option<SignedDuration> {
    if !hours.is_finite() || hours < 0.0 {
        return None;
    }
    SignedDuration::try_from_secs_f64(hours * SECONDS_PER_HOUR).ok()
}

/// Converts a duration into fractional hours.
pub fn to_hours(duration: SignedDuration) -> f64 {
    duration.as_secs_f64() / SECONDS_PER_HOUR
}

/// Serde adapter: a [`SignedDuration`] written as fractional hours.
pub mod as_hours {
    use jiff::SignedDuration;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        duration: &SignedDuration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(super::to_hours(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SignedDuration, D::Error> {
        let hours = f64::deserialize(deserializer)?;
        super::from_hours(hours)
            .ok_or_else(|| D::Error::custom(format!("invalid hour value: {hours}")))
    }
}
