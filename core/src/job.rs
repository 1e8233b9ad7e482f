//! Requests flowing through the desk.

use crate::{
    error::{SimError, SimResult},
    types::Minutes,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three request types. Each one also names the operator tier that
/// natively handles it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Primary,
    Secondary,
    Generalist,
}

impl RequestType {
    /// Every type, in tie-break priority order.
    pub const ALL: [RequestType; 3] = [Self::Primary, Self::Secondary, Self::Generalist];

    /// Stable slot used to index per-type arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Primary    => 0,
            Self::Secondary  => 1,
            Self::Generalist => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Primary    => "primary",
            Self::Secondary  => "secondary",
            Self::Generalist => "generalist",
        }
    }

    /// Whether a job of this type may spill over onto the Generalist tier
    /// and is subject to the excess-wait drop rule.
    pub fn is_specialist(self) -> bool {
        !matches!(self, Self::Generalist)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RequestType {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s {
            "primary"    => Ok(Self::Primary),
            "secondary"  => Ok(Self::Secondary),
            "generalist" => Ok(Self::Generalist),
            other => Err(SimError::UnknownRequestType { name: other.to_string() }),
        }
    }
}

/// A single request. Everything but `overflow` is fixed at arrival.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub arrival:      Minutes,
    pub request_type: RequestType,
    pub duration:     Minutes,
    /// Set when a Generalist operator picked the job up instead of its own tier.
    pub overflow:     bool,
}

impl Job {
    pub fn new(arrival: Minutes, request_type: RequestType, duration: Minutes) -> Self {
        Self {
            arrival,
            request_type,
            duration,
            overflow: false,
        }
    }

    /// The tier whose operator actually performs the work.
    pub fn serving_tier(&self) -> RequestType {
        if self.overflow {
            RequestType::Generalist
        } else {
            self.request_type
        }
    }
}
