//! Operator tiers: per-operator scheduling slots.
//!
//! Each operator owns two pieces of state:
//!   - whether it is serving, and until when (`OperatorState`);
//!   - a single backlog slot holding the next job, if any.
//!
//! RULE: an operator is free only when it is Idle AND its backlog slot
//! is empty. A busy operator with an empty slot may accept one queued job.

use crate::{
    error::{SimError, SimResult},
    job::{Job, RequestType},
    types::{Minutes, OperatorIndex},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OperatorState {
    /// No departure scheduled.
    Idle,
    /// Serving a job of type `serving` until `until`.
    Busy { until: Minutes, serving: RequestType },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatorSlot {
    pub state:   OperatorState,
    pub backlog: Option<Job>,
}

impl OperatorSlot {
    fn idle() -> Self {
        Self { state: OperatorState::Idle, backlog: None }
    }

    pub fn is_free(&self) -> bool {
        self.state == OperatorState::Idle && self.backlog.is_none()
    }

    pub fn departure(&self) -> Option<Minutes> {
        match self.state {
            OperatorState::Idle => None,
            OperatorState::Busy { until, .. } => Some(until),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorTier {
    kind:  RequestType,
    slots: Vec<OperatorSlot>,
}

impl OperatorTier {
    pub fn new(kind: RequestType, operators: usize) -> Self {
        Self {
            kind,
            slots: vec![OperatorSlot::idle(); operators],
        }
    }

    pub fn kind(&self) -> RequestType {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: OperatorIndex) -> Option<&OperatorSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[OperatorSlot] {
        &self.slots
    }

    /// First free operator by index.
    pub fn first_free(&self) -> Option<OperatorIndex> {
        self.slots.iter().position(OperatorSlot::is_free)
    }

    /// Busy operator with an empty backlog slot and the strictly smallest
    /// departure. Ties go to the lowest index.
    pub fn backlog_candidate(&self) -> Option<(OperatorIndex, Minutes)> {
        let mut best: Option<(OperatorIndex, Minutes)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.backlog.is_some() {
                continue;
            }
            let Some(until) = slot.departure() else { continue };
            if best.map_or(true, |(_, best_until)| until < best_until) {
                best = Some((index, until));
            }
        }
        best
    }

    /// Earliest scheduled departure in this tier, lowest index on ties.
    pub fn earliest_departure(&self) -> Option<(OperatorIndex, Minutes)> {
        let mut best: Option<(OperatorIndex, Minutes)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(until) = slot.departure() else { continue };
            if best.map_or(true, |(_, best_until)| until < best_until) {
                best = Some((index, until));
            }
        }
        best
    }

    /// Put `index` to work until `until`. Overwrites any previous departure.
    pub fn begin_service(&mut self, index: OperatorIndex, until: Minutes, serving: RequestType) {
        self.slots[index].state = OperatorState::Busy { until, serving };
    }

    /// Queue `job` behind the current service of `index`.
    /// An occupied slot is never overwritten.
    pub fn enqueue(&mut self, index: OperatorIndex, job: Job) -> SimResult<()> {
        let slot = &mut self.slots[index];
        if slot.backlog.is_some() {
            return Err(SimError::BacklogOccupied { tier: self.kind, operator: index });
        }
        slot.backlog = Some(job);
        Ok(())
    }

    /// End the current service of `index`. Returns the type that was being
    /// served and the queued job, if any; the slot is left Idle and empty.
    pub fn complete(&mut self, index: OperatorIndex) -> (RequestType, Option<Job>) {
        let slot = &mut self.slots[index];
        let served = match slot.state {
            OperatorState::Busy { serving, .. } => serving,
            OperatorState::Idle => self.kind,
        };
        slot.state = OperatorState::Idle;
        (served, slot.backlog.take())
    }

    /// Types of every job still in service or queued in this tier.
    pub fn unresolved(&self) -> impl Iterator<Item = RequestType> + '_ {
        self.slots.iter().flat_map(|slot| {
            let serving = match slot.state {
                OperatorState::Busy { serving, .. } => Some(serving),
                OperatorState::Idle => None,
            };
            serving
                .into_iter()
                .chain(slot.backlog.as_ref().map(|job| job.request_type))
        })
    }
}

/// A departure picked by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextDeparture {
    pub time:     Minutes,
    pub tier:     RequestType,
    pub operator: OperatorIndex,
}

/// The three tiers, addressed by request type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSet {
    tiers: [OperatorTier; 3],
}

impl TierSet {
    pub fn new(primary: usize, secondary: usize, generalist: usize) -> Self {
        Self {
            tiers: [
                OperatorTier::new(RequestType::Primary, primary),
                OperatorTier::new(RequestType::Secondary, secondary),
                OperatorTier::new(RequestType::Generalist, generalist),
            ],
        }
    }

    pub fn tier(&self, kind: RequestType) -> &OperatorTier {
        &self.tiers[kind.index()]
    }

    pub fn tier_mut(&mut self, kind: RequestType) -> &mut OperatorTier {
        &mut self.tiers[kind.index()]
    }

    /// Minimum scheduled departure across all tiers.
    /// Ties: Primary before Secondary before Generalist, then lowest index.
    pub fn next_departure(&self) -> Option<NextDeparture> {
        let mut best: Option<NextDeparture> = None;
        for kind in RequestType::ALL {
            let Some((operator, time)) = self.tier(kind).earliest_departure() else { continue };
            if best.map_or(true, |b| time < b.time) {
                best = Some(NextDeparture { time, tier: kind, operator });
            }
        }
        best
    }
}
