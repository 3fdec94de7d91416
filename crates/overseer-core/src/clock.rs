//! Simulation clock driven by externally supplied timestamps.
//!
//! The engine never reads the wall clock. Drivers pass a monotonic `now`
//! into every tick and the clock turns it into a step: the time since the
//! previous tick and the running elapsed total.
//!
//! # Guarantees
//!
//! - Elapsed time never decreases.
//! - A timestamp earlier than the previous one, or a non-finite one, yields
//!   a zero-length step instead of a negative or NaN delta.

use tracing::warn;

/// Errors that can occur when creating a clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The start timestamp is NaN or infinite.
    #[error("invalid start time: {value}")]
    InvalidStart {
        /// The rejected timestamp.
        value: f64,
    },
}

/// The result of advancing the clock to a new timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockStep {
    /// Timestamp the step ends at (the previous one if the input was rejected).
    pub now: f64,
    /// Seconds since the previous step; never negative.
    pub delta: f64,
    /// Total seconds elapsed since the clock started.
    pub elapsed: f64,
}

/// Clock tracking the last observed timestamp and total elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    /// Timestamp the clock was created at.
    started_at: f64,
    /// Most recent accepted timestamp.
    last_update: f64,
    /// Sum of all accepted deltas.
    elapsed: f64,
}

impl SimClock {
    /// Create a clock whose first step is measured from `started_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidStart`] if `started_at` is not finite.
    pub fn new(started_at: f64) -> Result<Self, ClockError> {
        if !started_at.is_finite() {
            return Err(ClockError::InvalidStart { value: started_at });
        }
        Ok(Self {
            started_at,
            last_update: started_at,
            elapsed: 0.0,
        })
    }

    /// Advance to `now`, returning the step taken.
    pub fn advance(&mut self, now: f64) -> ClockStep {
        let delta = self.accept(now);
        self.elapsed += delta;
        ClockStep {
            now: self.last_update,
            delta,
            elapsed: self.elapsed,
        }
    }

    /// Record `now` as observed without adding to elapsed time.
    ///
    /// Used once the simulation has ended: the driver keeps ticking but the
    /// simulated world is frozen.
    pub fn observe(&mut self, now: f64) {
        let _ = self.accept(now);
    }

    /// Validate `now` and move `last_update` forward, returning the delta.
    fn accept(&mut self, now: f64) -> f64 {
        if !now.is_finite() {
            warn!(now, "Non-finite timestamp ignored");
            return 0.0;
        }
        if now < self.last_update {
            warn!(
                now,
                last_update = self.last_update,
                "Timestamp went backwards, treating as zero-length step"
            );
            return 0.0;
        }
        let delta = now - self.last_update;
        self.last_update = now;
        delta
    }

    /// Timestamp the clock was created at.
    pub const fn started_at(&self) -> f64 {
        self.started_at
    }

    /// Most recent accepted timestamp.
    pub const fn last_update(&self) -> f64 {
        self.last_update
    }

    /// Total simulated seconds.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
