//! The simulation engine: next-event loop over arrivals and departures.
//!
//! STEP (repeated until the clock reaches the horizon):
//!   1. Ask the tiers for the earliest scheduled departure
//!      (ties: Primary > Secondary > Generalist, then lowest index).
//!   2. If one exists and the next arrival is not earlier, process the
//!      departure at its instant.
//!   3. Otherwise process the arrival at TPLL and schedule the next one
//!      by adding a sampled gap in working minutes.
//!
//! RULES:
//!   - Time never moves backwards; the clock enforces it.
//!   - All randomness flows through the engine's single DeskRng.
//!   - Every state change is published as a DeskEvent, in order.
//!   - Events past the horizon are never processed.

use crate::{
    calendar::{add_working_minutes, format_minutes, horizon_end, shift_start_of},
    clock::DeskClock,
    config::{DeskConfig, OperatorCounts, RequestMix, SlaPolicy},
    error::{SimError, SimResult},
    event::{DeskEvent, DeskObserver, LogObserver, NoopObserver},
    metrics::{MetricsAccumulator, SimulationReport},
    rng::DeskRng,
    sampling::{self, checked, InterarrivalSampler, ServiceSampler, TypeSampler},
    tier::TierSet,
    types::Minutes,
};

pub struct DeskEngine {
    pub(crate) operators:    OperatorCounts,
    pub(crate) tiers:        TierSet,
    pub(crate) metrics:      MetricsAccumulator,
    pub(crate) clock:        DeskClock,
    pub(crate) rng:          DeskRng,
    pub(crate) sla:          SlaPolicy,
    interarrival:            InterarrivalSampler,
    pub(crate) service:      ServiceSampler,
    pub(crate) type_sampler: TypeSampler,
    /// Events produced by the current step, flushed to the observer after it.
    pub(crate) outbox:       Vec<DeskEvent>,
    debug:                   bool,
}

impl DeskEngine {
    /// Build an engine whose samplers come from the configured distributions.
    pub fn new(config: &DeskConfig) -> SimResult<Self> {
        config.validate()?;
        let mut engine = Self::with_samplers(
            config.operators,
            sampling::interarrival_from(config.interarrival.clone()),
            sampling::service_from(config.service.as_array()),
            config.seed,
        )
        .with_type_sampler(sampling::type_mix(config.request_mix))
        .with_sla_policy(config.sla);
        engine.debug = config.debug;
        Ok(engine)
    }

    /// Build an engine around injected sampling strategies.
    /// Request types follow the default 70/20/10 mix.
    pub fn with_samplers(
        operators: OperatorCounts,
        interarrival: InterarrivalSampler,
        service: ServiceSampler,
        seed: u64,
    ) -> Self {
        Self {
            operators,
            tiers: TierSet::new(operators.primary, operators.secondary, operators.generalist),
            metrics: MetricsAccumulator::new(),
            clock: DeskClock::new(shift_start_of(0), shift_start_of(0)),
            rng: DeskRng::new(seed),
            sla: SlaPolicy::default(),
            interarrival,
            service,
            type_sampler: sampling::type_mix(RequestMix::default()),
            outbox: Vec::new(),
            debug: false,
        }
    }

    pub fn with_type_sampler(mut self, sampler: TypeSampler) -> Self {
        self.type_sampler = sampler;
        self
    }

    pub fn with_sla_policy(mut self, policy: SlaPolicy) -> Self {
        self.sla = policy;
        self
    }

    pub fn tiers(&self) -> &TierSet {
        &self.tiers
    }

    pub fn metrics(&self) -> &MetricsAccumulator {
        &self.metrics
    }

    pub fn clock(&self) -> &DeskClock {
        &self.clock
    }

    /// Simulate `days` working days. Events go to the log when the
    /// config's debug flag is set and are discarded otherwise.
    pub fn run(&mut self, days: u32) -> SimResult<SimulationReport> {
        if self.debug {
            self.run_observed(days, &mut LogObserver)
        } else {
            self.run_observed(days, &mut NoopObserver)
        }
    }

    /// Simulate `days` working days, publishing every event to `observer`.
    pub fn run_observed(
        &mut self,
        days: u32,
        observer: &mut dyn DeskObserver,
    ) -> SimResult<SimulationReport> {
        if days < 1 {
            return Err(SimError::InvalidDays { days });
        }

        let start = shift_start_of(0);
        let horizon = horizon_end(days);
        self.tiers = TierSet::new(
            self.operators.primary,
            self.operators.secondary,
            self.operators.generalist,
        );
        self.metrics = MetricsAccumulator::new();
        self.clock = DeskClock::new(start, horizon);
        self.outbox.clear();

        log::info!(
            "desk run: seed={} days={days} operators={}/{}/{}",
            self.rng.seed(),
            self.operators.primary,
            self.operators.secondary,
            self.operators.generalist
        );
        self.emit(DeskEvent::RunInitialized { seed: self.rng.seed(), days, horizon });

        self.schedule_next_arrival(start)?;
        self.flush(observer)?;

        while !self.clock.is_finished() {
            let departure = self.tiers.next_departure();
            let next_arrival = self.clock.next_arrival;

            match departure {
                Some(d) if next_arrival >= d.time => {
                    if !self.clock.within_horizon(d.time) {
                        break;
                    }
                    self.clock.advance_to(d.time)?;
                    self.process_departure(d.tier, d.operator);
                }
                _ => {
                    if !self.clock.within_horizon(next_arrival) {
                        break;
                    }
                    let now = self.clock.advance_to(next_arrival)?;
                    self.process_arrival()?;
                    self.schedule_next_arrival(now)?;
                }
            }
            self.flush(observer)?;
        }

        if !self.clock.is_finished() {
            self.clock.advance_to(horizon)?;
        }
        self.emit(DeskEvent::RunCompleted { time: self.clock.now });
        self.flush(observer)?;

        let report = self.metrics.report(&self.tiers, self.rng.seed(), days, self.clock.now);
        log::info!(
            "desk run finished at {}: served {}/{}/{} lost {}/{}/{}",
            format_minutes(self.clock.now),
            report.primary.served,
            report.secondary.served,
            report.generalist.served,
            report.primary.lost,
            report.secondary.lost,
            report.generalist.lost
        );
        Ok(report)
    }

    pub(crate) fn emit(&mut self, event: DeskEvent) {
        self.outbox.push(event);
    }

    fn flush(&mut self, observer: &mut dyn DeskObserver) -> SimResult<()> {
        for event in self.outbox.drain(..) {
            observer.on_event(&event)?;
        }
        Ok(())
    }

    /// Draw the next gap and set TPLL. TPLL must land strictly after `now`.
    fn schedule_next_arrival(&mut self, now: Minutes) -> SimResult<()> {
        let gap = checked("interarrival", (self.interarrival)(&mut self.rng))?;
        let next = add_working_minutes(now, gap);
        if next <= now {
            return Err(SimError::InvalidSample { what: "interarrival", value: gap });
        }
        self.clock.schedule_arrival(next);
        Ok(())
    }
}
