//! Time management for the simulation
//!
//! The simulation operates on an opaque nanosecond clock. Agents never read
//! wall-clock time; every timestamp they see is a `SimTime` handed to them by
//! the scheduling kernel, and every wait is expressed by asking the kernel
//! for a future wakeup.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// A point on the simulated clock, in nanoseconds since the session epoch.
///
/// `SimTime` is totally ordered and supports offsetting by a [`SimDuration`].
///
/// # Example
/// ```
/// use spoofing_simulator_core_rs::{SimDuration, SimTime};
///
/// let open = SimTime::from_nanos(1_000);
/// let later = open + SimDuration::from_nanos(500);
/// assert!(later > open);
/// assert_eq!(later - open, SimDuration::from_nanos(500));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SimTime(u64);

impl SimTime {
    /// The session epoch (midnight of the simulated day).
    pub const EPOCH: SimTime = SimTime(0);

    /// Create a timestamp from nanoseconds since the session epoch.
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Nanoseconds since the session epoch.
    pub fn nanos(&self) -> u64 {
        self.0
    }

    /// The timestamp `duration` before this one, saturating at the epoch.
    ///
    /// # Example
    /// ```
    /// use spoofing_simulator_core_rs::{SimDuration, SimTime};
    ///
    /// let close = SimTime::from_nanos(100);
    /// assert_eq!(
    ///     close.saturating_sub(SimDuration::from_nanos(250)),
    ///     SimTime::EPOCH
    /// );
    /// ```
    pub fn saturating_sub(&self, duration: SimDuration) -> SimTime {
        SimTime(self.0.saturating_sub(duration.nanos()))
    }
}

impl Add<SimDuration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimDuration) -> SimTime {
        SimTime(self.0 + rhs.nanos())
    }
}

impl AddAssign<SimDuration> for SimTime {
    fn add_assign(&mut self, rhs: SimDuration) {
        self.0 += rhs.nanos();
    }
}

impl Sub<SimTime> for SimTime {
    type Output = SimDuration;

    /// Elapsed span between two timestamps, saturating at zero.
    fn sub(self, rhs: SimTime) -> SimDuration {
        SimDuration::from_nanos(self.0.saturating_sub(rhs.0))
    }
}

/// A span of simulated time, in nanoseconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SimDuration(u64);

impl SimDuration {
    /// A zero-length span.
    pub const ZERO: SimDuration = SimDuration(0);

    /// Create a span from nanoseconds.
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Create a span from microseconds.
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros * 1_000)
    }

    /// Create a span from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1_000_000)
    }

    /// Create a span from whole seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1_000_000_000)
    }

    /// The span in nanoseconds.
    pub fn nanos(&self) -> u64 {
        self.0
    }
}

/// Open and close timestamps of the simulated trading session.
///
/// Published to each agent by the order-management substrate once the
/// open/close discovery handshake completes; until then agents see no
/// session at all and defer all activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketHours {
    /// First timestamp at which orders are accepted.
    pub open: SimTime,
    /// Timestamp at which the market closes for the day.
    pub close: SimTime,
}

impl MarketHours {
    /// Create a session spanning `[open, close)`.
    ///
    /// # Panics
    /// Panics if `open >= close`.
    pub fn new(open: SimTime, close: SimTime) -> Self {
        assert!(open < close, "market must open before it closes");
        Self { open, close }
    }

    /// Whether `time` falls inside the session.
    pub fn contains(&self, time: SimTime) -> bool {
        self.open <= time && time < self.close
    }
}
