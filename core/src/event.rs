//! Trace events and the observer hook.
//!
//! RULE: the engine never prints. Every state change it makes is published
//! as a DeskEvent to the attached observer, in the exact order it happened.
//! Observers may record, log or persist events; they cannot alter the run.

use crate::{
    calendar::{format_minutes, shift_start_of},
    error::SimResult,
    job::RequestType,
    types::{Minutes, OperatorIndex, RunId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    RunInitialized {
        seed:    u64,
        days:    u32,
        horizon: Minutes,
    },
    JobArrived {
        time:         Minutes,
        request_type: RequestType,
        duration:     Minutes,
    },
    ServiceStarted {
        time:         Minutes,
        tier:         RequestType,
        operator:     OperatorIndex,
        request_type: RequestType,
        /// Trigger instant normalized into the shift.
        start:        Minutes,
        wait:         Minutes,
        finish:       Minutes,
        overflow:     bool,
    },
    JobBacklogged {
        time:         Minutes,
        tier:         RequestType,
        operator:     OperatorIndex,
        request_type: RequestType,
    },
    JobLost {
        time:         Minutes,
        request_type: RequestType,
        reason:       LossReason,
    },
    ServiceCompleted {
        time:        Minutes,
        tier:        RequestType,
        operator:    OperatorIndex,
        served_type: RequestType,
    },
    RunCompleted {
        time: Minutes,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    /// No free operator and no backlog slot available.
    NoCapacity,
    /// A backlog slot existed but the projected wait tripped the drop rule.
    ExcessWait,
}

impl DeskEvent {
    /// Stable name, used for the event_type column of the trace store.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. }   => "run_initialized",
            Self::JobArrived { .. }       => "job_arrived",
            Self::ServiceStarted { .. }   => "service_started",
            Self::JobBacklogged { .. }    => "job_backlogged",
            Self::JobLost { .. }          => "job_lost",
            Self::ServiceCompleted { .. } => "service_completed",
            Self::RunCompleted { .. }     => "run_completed",
        }
    }

    /// Simulated instant the event happened at.
    pub fn time(&self) -> Minutes {
        match self {
            Self::RunInitialized { .. } => shift_start_of(0),
            Self::JobArrived { time, .. }
            | Self::ServiceStarted { time, .. }
            | Self::JobBacklogged { time, .. }
            | Self::JobLost { time, .. }
            | Self::ServiceCompleted { time, .. }
            | Self::RunCompleted { time } => *time,
        }
    }
}

/// Hook invoked by the engine for every DeskEvent.
pub trait DeskObserver {
    fn on_event(&mut self, event: &DeskEvent) -> SimResult<()>;
}

/// Keeps every event in memory. Used by tests and replay tooling.
#[derive(Debug, Default)]
pub struct EventRecorder {
    pub events: Vec<DeskEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeskObserver for EventRecorder {
    fn on_event(&mut self, event: &DeskEvent) -> SimResult<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl DeskObserver for NoopObserver {
    fn on_event(&mut self, _event: &DeskEvent) -> SimResult<()> {
        Ok(())
    }
}

/// Forwards events to the `log` facade at debug level.
#[derive(Debug, Default)]
pub struct LogObserver;

impl DeskObserver for LogObserver {
    fn on_event(&mut self, event: &DeskEvent) -> SimResult<()> {
        match event {
            DeskEvent::RunInitialized { seed, days, horizon } => {
                log::debug!("run: seed={seed} days={days} horizon={}", format_minutes(*horizon));
            }
            DeskEvent::JobArrived { time, request_type, duration } => {
                log::debug!("[{}] arrival {request_type} duration={duration:.1}", format_minutes(*time));
            }
            DeskEvent::ServiceStarted { time, tier, operator, request_type, start, wait, finish, .. } => {
                log::debug!(
                    "[{}] start {request_type} on {tier}#{operator} at {} wait={wait:.1} finish={}",
                    format_minutes(*time),
                    format_minutes(*start),
                    format_minutes(*finish)
                );
            }
            DeskEvent::JobBacklogged { time, tier, operator, request_type } => {
                log::debug!("[{}] backlog {request_type} on {tier}#{operator}", format_minutes(*time));
            }
            DeskEvent::JobLost { time, request_type, reason } => {
                log::debug!("[{}] lost {request_type} ({reason:?})", format_minutes(*time));
            }
            DeskEvent::ServiceCompleted { time, tier, operator, served_type } => {
                log::debug!("[{}] done {served_type} on {tier}#{operator}", format_minutes(*time));
            }
            DeskEvent::RunCompleted { time } => {
                log::debug!("run completed at {}", format_minutes(*time));
            }
        }
        Ok(())
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub seq:        u64,
    pub sim_time:   Minutes,
    pub event_type: String,
    pub payload:    String, // JSON-serialized DeskEvent
}
