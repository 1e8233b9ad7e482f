//! Tiered assignment: own tier first, then Generalist overflow, then a
//! same-tier backlog slot, subject to the excess-wait drop rule.

use crate::{
    config::SlaPolicy,
    engine::DeskEngine,
    job::{Job, RequestType},
    types::{Minutes, OperatorIndex},
};

/// Result of looking for a backlog slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklogOutcome {
    Assigned(OperatorIndex),
    /// A slot existed but the drop rule discarded the job.
    ExcessWait,
    /// No busy operator of the tier had an empty slot.
    NoCandidate,
}

/// Whether a job facing `projected_wait` is dropped given the coin `draw`.
pub fn sla_drop_applies(projected_wait: Minutes, draw: f64, policy: &SlaPolicy) -> bool {
    projected_wait > policy.wait_threshold_minutes && draw < policy.drop_probability
}

impl DeskEngine {
    /// First free operator of the job's own tier. Specialist jobs fall back
    /// to a free Generalist operator, which marks the job as overflow.
    pub(crate) fn find_free_operator(&mut self, job: &mut Job) -> Option<OperatorIndex> {
        if let Some(index) = self.tiers.tier(job.request_type).first_free() {
            return Some(index);
        }
        if !job.request_type.is_specialist() {
            return None;
        }

        let index = self.tiers.tier(RequestType::Generalist).first_free()?;
        job.overflow = true;
        self.metrics.record_overflow(job.request_type);
        Some(index)
    }

    /// Busy operator of the same tier with an empty slot and the earliest
    /// departure. Specialist tiers draw a coin when the projected wait
    /// exceeds the threshold; no draw happens without a candidate.
    pub(crate) fn find_backlog_operator(&mut self, kind: RequestType, arrival: Minutes) -> BacklogOutcome {
        let Some((index, until)) = self.tiers.tier(kind).backlog_candidate() else {
            return BacklogOutcome::NoCandidate;
        };

        if kind.is_specialist() {
            let projected_wait = until - arrival;
            if projected_wait > self.sla.wait_threshold_minutes {
                let draw = self.rng.next_f64();
                if sla_drop_applies(projected_wait, draw, &self.sla) {
                    self.metrics.record_excess_wait_drop(kind);
                    log::warn!(
                        "dropping {kind} request: projected wait {projected_wait:.1} min on operator {index}"
                    );
                    return BacklogOutcome::ExcessWait;
                }
            }
        }
        BacklogOutcome::Assigned(index)
    }
}
