//! Duty cycle simulation: schedule a trip's driving under hours-of-service limits.
//!
//! The trip opens with a pickup, drives in chunks bounded by the shift and
//! break limits, rests when a limit is reached, and closes with a dropoff.
//! Each pass through the loop is one [`Transition`], chosen by
//! [`SimulationState::next_transition`] and applied by
//! [`SimulationState::apply`].

use jiff::SignedDuration;

use crate::hours;
use crate::model::{DutyEvent, DutyReason};

/// Maximum driving in one shift.
pub const MAX_SHIFT_DRIVING: SignedDuration = SignedDuration::from_hours(11);
/// Maximum on-duty span of one shift.
pub const MAX_SHIFT_ON_DUTY: SignedDuration = SignedDuration::from_hours(14);
/// Driving allowed before a short break is owed.
pub const DRIVING_BEFORE_BREAK: SignedDuration = SignedDuration::from_hours(8);
pub const SHORT_BREAK: SignedDuration = SignedDuration::from_mins(30);
pub const FULL_RESET: SignedDuration = SignedDuration::from_hours(10);
pub const SLEEPER_BERTH: SignedDuration = SignedDuration::from_hours(8);
/// Rolling cycle cap on on-duty time.
pub const CYCLE_LIMIT: SignedDuration = SignedDuration::from_hours(70);
pub const PICKUP: SignedDuration = SignedDuration::from_hours(1);
pub const DROPOFF: SignedDuration = SignedDuration::from_hours(1);

/// Errors that reject a trip plan.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SimulationError {
    #[error(
        "trip is not possible within the 70-hour cycle limit \
         ({cycle_used_hours:.2}h used before the remaining driving)"
    )]
    CycleLimitExceeded { cycle_used_hours: f64 },

    #[error("{field} must be a non-negative number of hours, got {value}")]
    InvalidHours { field: &'static str, value: f64 },
}

/// Running totals while a trip is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationState {
    /// Trip driving not yet scheduled.
    pub remaining_drive: SignedDuration,
    /// Driving since the last full reset.
    pub shift_drive: SignedDuration,
    /// On-duty time, driving included, since the last full reset.
    pub shift_on_duty: SignedDuration,
    pub drive_since_break: SignedDuration,
    /// Rolling cycle usage, this trip included.
    pub cycle_used: SignedDuration,
}

/// One step of the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A shift cap was reached: 10-hour reset plus sleeper berth, new shift.
    FullReset,
    /// Eight hours driven without a break.
    ShortBreak,
    /// Drive for the given duration.
    Drive(SignedDuration),
}

impl SimulationState {
    pub fn new(remaining_drive: SignedDuration, cycle_used: SignedDuration) -> Self {
        Self {
            remaining_drive,
            shift_drive: SignedDuration::ZERO,
            shift_on_duty: SignedDuration::ZERO,
            drive_since_break: SignedDuration::ZERO,
            cycle_used,
        }
    }

    /// Picks the next transition, or `None` once all driving is scheduled.
    ///
    /// Guards are checked in order: shift caps, break, cycle cap. The cycle
    /// cap is only checked when more driving is about to be scheduled.
    pub fn next_transition(&self) -> Result<Option<Transition>, SimulationError> {
        if !self.remaining_drive.is_positive() {
            return Ok(None);
        }
        if self.shift_drive >= MAX_SHIFT_DRIVING || self.shift_on_duty >= MAX_SHIFT_ON_DUTY {
            return Ok(Some(Transition::FullReset));
        }
        if self.drive_since_break >= DRIVING_BEFORE_BREAK {
            return Ok(Some(Transition::ShortBreak));
        }
        if self.cycle_used >= CYCLE_LIMIT {
            return Err(SimulationError::CycleLimitExceeded {
                cycle_used_hours: hours::to_hours(self.cycle_used),
            });
        }

        let drivable = self
            .remaining_drive
            .min(MAX_SHIFT_DRIVING - self.shift_drive)
            .min(DRIVING_BEFORE_BREAK - self.drive_since_break);
        Ok(Some(Transition::Drive(drivable)))
    }

    /// Applies a transition, appending the events it produces.
    pub fn apply(&mut self, transition: Transition, events: &mut Vec<DutyEvent>) {
        log::trace!("{:?} from {:?}", transition, self);
        match transition {
            Transition::FullReset => {
                events.push(DutyEvent::off_duty(FULL_RESET, DutyReason::FullReset));
                events.push(DutyEvent::off_duty(SLEEPER_BERTH, DutyReason::SleeperBerth));
                self.shift_drive = SignedDuration::ZERO;
                self.shift_on_duty = SignedDuration::ZERO;
                self.drive_since_break = SignedDuration::ZERO;
            }
            Transition::ShortBreak => {
                events.push(DutyEvent::off_duty(SHORT_BREAK, DutyReason::ShortBreak));
                self.shift_on_duty += SHORT_BREAK;
                self.drive_since_break = SignedDuration::ZERO;
            }
            Transition::Drive(duration) => {
                events.push(DutyEvent::driving(duration));
                self.remaining_drive -= duration;
                self.shift_drive += duration;
                self.shift_on_duty += duration;
                self.drive_since_break += duration;
                self.cycle_used += duration;

                // Hitting the shift driving cap sends the driver straight to the berth.
                // The rest is counted as on-duty time for the shift and the cycle.
                if self.shift_drive >= MAX_SHIFT_DRIVING {
                    events.push(DutyEvent::off_duty(SLEEPER_BERTH, DutyReason::SleeperBerth));
                    self.shift_on_duty += SLEEPER_BERTH;
                    self.cycle_used += SLEEPER_BERTH;
                }
            }
        }
    }

    /// Records a fixed on-duty block such as pickup or dropoff.
    fn work(&mut self, duration: SignedDuration, reason: DutyReason, events: &mut Vec<DutyEvent>) {
        events.push(DutyEvent::on_duty(duration, reason));
        self.shift_on_duty += duration;
        self.cycle_used += duration;
    }
}

/// Simulates a trip's duty cycle.
///
/// `total_driving_hours` is the driving the trip needs; `initial_cycle_hours`
/// is the on-duty time already used in the rolling cycle. Returns the events
/// in chronological order, pickup first and dropoff last.
pub fn simulate(
    total_driving_hours: f64,
    initial_cycle_hours: f64,
) -> Result<Vec<DutyEvent>, SimulationError> {
    let remaining_drive =
        hours::from_hours(total_driving_hours).ok_or(SimulationError::InvalidHours {
            field: "driving time",
            value: total_driving_hours,
        })?;
    let cycle_used =
        hours::from_hours(initial_cycle_hours).ok_or(SimulationError::InvalidHours {
            field: "cycle usage",
            value: initial_cycle_hours,
        })?;

    let mut state = SimulationState::new(remaining_drive, cycle_used);
    let mut events = Vec::new();

    state.work(PICKUP, DutyReason::Pickup, &mut events);
    while let Some(transition) = state.next_transition().inspect_err(|e| log::warn!("{e}"))? {
        state.apply(transition, &mut events);
    }
    state.work(DROPOFF, DutyReason::Dropoff, &mut events);

    log::debug!(
        "simulated {total_driving_hours}h of driving in {} events, cycle at {:.2}h",
        events.len(),
        hours::to_hours(state.cycle_used)
    );
    Ok(events)
}
