//! Service actions: the state transitions behind arrivals and departures.
//!
//! Per operator:  Idle --assign--> Serving --depart, slot empty--> Idle
//!                                 Serving --depart, slot full---> Serving(next)

use crate::{
    calendar::{add_working_minutes, normalize_to_shift},
    engine::DeskEngine,
    error::SimResult,
    event::{DeskEvent, LossReason},
    job::{Job, RequestType},
    routing::BacklogOutcome,
    sampling::checked,
    types::{Minutes, OperatorIndex},
};

impl DeskEngine {
    /// Put `job` in service on `operator` of the tier that actually serves it.
    /// Wait is credited to the job's original type.
    pub(crate) fn start_service(&mut self, trigger: Minutes, job: Job, operator: OperatorIndex) {
        let start = normalize_to_shift(trigger);
        let wait = start - job.arrival;
        self.metrics.record_wait(job.request_type, wait);

        let finish = add_working_minutes(start, job.duration);
        let tier = job.serving_tier();
        self.tiers.tier_mut(tier).begin_service(operator, finish, job.request_type);

        self.emit(DeskEvent::ServiceStarted {
            time: trigger,
            tier,
            operator,
            request_type: job.request_type,
            start,
            wait,
            finish,
            overflow: job.overflow,
        });
    }

    /// Finish the current service of (`tier`, `operator`) at the clock's
    /// instant. A queued job starts right away on the same operator.
    pub(crate) fn process_departure(&mut self, tier: RequestType, operator: OperatorIndex) {
        let now = self.clock.now;
        let (served_type, queued) = self.tiers.tier_mut(tier).complete(operator);
        self.metrics.record_served(served_type);
        self.emit(DeskEvent::ServiceCompleted { time: now, tier, operator, served_type });

        if let Some(job) = queued {
            self.start_service(now, job, operator);
        }
    }

    /// Handle an arrival at the clock's instant: draw type and duration,
    /// then serve, queue or lose the job.
    pub(crate) fn process_arrival(&mut self) -> SimResult<()> {
        let now = self.clock.now;
        let request_type = (self.type_sampler)(&mut self.rng);
        let duration = checked("service duration", (self.service)(request_type, &mut self.rng))?;
        self.metrics.record_arrival(request_type);
        self.emit(DeskEvent::JobArrived { time: now, request_type, duration });

        let mut job = Job::new(now, request_type, duration);
        if let Some(operator) = self.find_free_operator(&mut job) {
            self.start_service(now, job, operator);
            return Ok(());
        }

        let reason = match self.find_backlog_operator(request_type, now) {
            BacklogOutcome::Assigned(operator) => {
                self.tiers.tier_mut(request_type).enqueue(operator, job)?;
                self.emit(DeskEvent::JobBacklogged { time: now, tier: request_type, operator, request_type });
                return Ok(());
            }
            BacklogOutcome::ExcessWait => LossReason::ExcessWait,
            BacklogOutcome::NoCandidate => LossReason::NoCapacity,
        };

        self.metrics.record_lost(request_type);
        self.emit(DeskEvent::JobLost { time: now, request_type, reason });
        Ok(())
    }
}
