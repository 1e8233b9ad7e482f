//! Per-type counters and the end-of-run report.

use crate::{job::RequestType, tier::TierSet, types::Minutes};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TypeCounters {
    pub arrivals:     u64,
    pub served:       u64,
    pub lost:         u64,
    pub wait_minutes: Minutes,
}

/// Accumulates outcomes while the engine runs. Wait is credited when a
/// service starts, `served` when it completes, `lost` on a failed assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsAccumulator {
    by_type: [TypeCounters; 3],
    /// Specialist jobs picked up by a Generalist operator, by origin.
    overflow: [u64; 3],
    /// Specialist jobs dropped by the excess-wait rule, by origin.
    excess_wait_drops: [u64; 3],
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self, kind: RequestType) -> &TypeCounters {
        &self.by_type[kind.index()]
    }

    pub fn record_arrival(&mut self, kind: RequestType) {
        self.by_type[kind.index()].arrivals += 1;
    }

    pub fn record_wait(&mut self, kind: RequestType, wait: Minutes) {
        self.by_type[kind.index()].wait_minutes += wait;
    }

    pub fn record_served(&mut self, kind: RequestType) {
        self.by_type[kind.index()].served += 1;
    }

    pub fn record_lost(&mut self, kind: RequestType) {
        self.by_type[kind.index()].lost += 1;
    }

    pub fn record_overflow(&mut self, origin: RequestType) {
        self.overflow[origin.index()] += 1;
    }

    pub fn record_excess_wait_drop(&mut self, origin: RequestType) {
        self.excess_wait_drops[origin.index()] += 1;
    }

    pub fn overflow(&self, origin: RequestType) -> u64 {
        self.overflow[origin.index()]
    }

    pub fn excess_wait_drops(&self, origin: RequestType) -> u64 {
        self.excess_wait_drops[origin.index()]
    }

    /// Mean wait over served jobs; 0.0 when nothing was served.
    pub fn mean_wait(&self, kind: RequestType) -> Minutes {
        let c = self.counters(kind);
        if c.served == 0 {
            0.0
        } else {
            c.wait_minutes / c.served as f64
        }
    }

    /// Freeze the counters into a report. Jobs still sitting in the tiers
    /// land in the `pending` bucket of their original type.
    pub fn report(&self, tiers: &TierSet, seed: u64, days: u32, final_clock: Minutes) -> SimulationReport {
        let mut pending = [0u64; 3];
        for kind in RequestType::ALL {
            for unresolved in tiers.tier(kind).unresolved() {
                pending[unresolved.index()] += 1;
            }
        }

        let outcome = |kind: RequestType| {
            let c = self.counters(kind);
            TypeOutcome {
                arrivals:          c.arrivals,
                served:            c.served,
                lost:              c.lost,
                pending:           pending[kind.index()],
                mean_wait_minutes: self.mean_wait(kind),
            }
        };

        SimulationReport {
            seed,
            days,
            final_clock,
            primary:    outcome(RequestType::Primary),
            secondary:  outcome(RequestType::Secondary),
            generalist: outcome(RequestType::Generalist),
            overflow_primary:            self.overflow(RequestType::Primary),
            overflow_secondary:          self.overflow(RequestType::Secondary),
            excess_wait_drops_primary:   self.excess_wait_drops(RequestType::Primary),
            excess_wait_drops_secondary: self.excess_wait_drops(RequestType::Secondary),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TypeOutcome {
    pub arrivals:          u64,
    pub served:            u64,
    pub lost:              u64,
    /// In service or queued when the horizon was reached.
    pub pending:           u64,
    pub mean_wait_minutes: Minutes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationReport {
    pub seed:        u64,
    pub days:        u32,
    pub final_clock: Minutes,
    pub primary:     TypeOutcome,
    pub secondary:   TypeOutcome,
    pub generalist:  TypeOutcome,
    pub overflow_primary:            u64,
    pub overflow_secondary:          u64,
    pub excess_wait_drops_primary:   u64,
    pub excess_wait_drops_secondary: u64,
}

impl SimulationReport {
    pub fn outcome(&self, kind: RequestType) -> &TypeOutcome {
        match kind {
            RequestType::Primary    => &self.primary,
            RequestType::Secondary  => &self.secondary,
            RequestType::Generalist => &self.generalist,
        }
    }
}
