//! Simulation clock: owns the logical time, the next arrival and the horizon.

use crate::{
    error::{SimError, SimResult},
    types::Minutes,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeskClock {
    /// Current simulated instant (T).
    pub now:          Minutes,
    /// Next scheduled arrival (TPLL).
    pub next_arrival: Minutes,
    /// Closing instant of the last simulated day.
    pub horizon:      Minutes,
}

impl DeskClock {
    pub fn new(start: Minutes, horizon: Minutes) -> Self {
        Self {
            now: start,
            next_arrival: start,
            horizon,
        }
    }

    /// Move the clock to `t`. Time never moves backwards.
    pub fn advance_to(&mut self, t: Minutes) -> SimResult<Minutes> {
        if t < self.now {
            return Err(SimError::ClockRegression { now: self.now, requested: t });
        }
        self.now = t;
        Ok(self.now)
    }

    pub fn schedule_arrival(&mut self, t: Minutes) {
        self.next_arrival = t;
    }

    pub fn is_finished(&self) -> bool {
        self.now >= self.horizon
    }

    /// Whether an event at `t` still falls inside the simulated window.
    pub fn within_horizon(&self, t: Minutes) -> bool {
        t <= self.horizon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_rejects_going_backwards() {
        let mut clock = DeskClock::new(540.0, 1080.0);
        assert_eq!(clock.advance_to(600.0).unwrap(), 600.0);
        assert_eq!(clock.advance_to(600.0).unwrap(), 600.0);

        let err = clock.advance_to(599.0).unwrap_err();
        assert!(matches!(err, SimError::ClockRegression { .. }), "got {err:?}");
        assert_eq!(clock.now, 600.0);
    }

    #[test]
    fn horizon_is_inclusive() {
        let mut clock = DeskClock::new(540.0, 1080.0);
        assert!(clock.within_horizon(1080.0));
        assert!(!clock.within_horizon(1080.5));
        clock.advance_to(1080.0).unwrap();
        assert!(clock.is_finished());
    }
}
