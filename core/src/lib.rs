//! Help desk simulator, a next-event simulation of a three-tier support
//! desk (Primary, Secondary, Generalist overflow) working a daily
//! 09:00–18:00 shift over a multi-day horizon.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod job;
pub mod metrics;
pub mod rng;
pub mod routing;
pub mod sampling;
pub mod service;
pub mod store;
pub mod tier;
pub mod types;

pub use config::DeskConfig;
pub use engine::DeskEngine;
pub use error::{SimError, SimResult};
pub use job::{Job, RequestType};
pub use metrics::SimulationReport;
