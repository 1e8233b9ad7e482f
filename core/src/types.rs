//! Shared primitive types used across the entire simulation.

/// Absolute simulated time, in minutes since day 0 00:00.
/// Durations are expressed in the same unit.
pub type Minutes = f64;

/// Position of an operator inside its tier. Stable for the whole run.
pub type OperatorIndex = usize;

/// The canonical run identifier used by the trace store.
pub type RunId = String;
