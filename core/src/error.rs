use crate::{job::RequestType, types::{Minutes, OperatorIndex}};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid horizon: days must be >= 1, got {days}")]
    InvalidDays { days: u32 },

    #[error("Unknown request type '{name}'")]
    UnknownRequestType { name: String },

    #[error("Sampler returned invalid {what}: {value}")]
    InvalidSample { what: &'static str, value: f64 },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Backlog slot of {tier:?} operator {operator} is already occupied")]
    BacklogOccupied { tier: RequestType, operator: OperatorIndex },

    #[error("Clock cannot move backwards: now={now}, requested={requested}")]
    ClockRegression { now: Minutes, requested: Minutes },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
