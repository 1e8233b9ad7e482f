//! Sampling strategies injected into the engine.
//!
//! The engine only relies on the contract "returns a finite, positive
//! duration in minutes". Output that breaks it is rejected by the engine
//! with SimError::InvalidSample before it can touch the clock.

use crate::{
    config::RequestMix,
    error::{SimError, SimResult},
    job::RequestType,
    rng::DeskRng,
    types::Minutes,
};
use serde::{Deserialize, Serialize};

pub type InterarrivalSampler = Box<dyn FnMut(&mut DeskRng) -> Minutes>;
pub type ServiceSampler = Box<dyn FnMut(RequestType, &mut DeskRng) -> Minutes>;
pub type TypeSampler = Box<dyn FnMut(&mut DeskRng) -> RequestType>;

/// Built-in duration distributions, selectable from configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    Constant { value: Minutes },
    Exponential { mean: Minutes },
    Uniform { min: Minutes, max: Minutes },
}

impl Distribution {
    pub fn sample(&self, rng: &mut DeskRng) -> Minutes {
        match *self {
            Self::Constant { value } => value,
            Self::Exponential { mean } => rng.exponential(mean),
            Self::Uniform { min, max } => rng.uniform(min, max),
        }
    }

    pub fn validate(&self, what: &str) -> SimResult<()> {
        let ok = match *self {
            Self::Constant { value } => value.is_finite() && value > 0.0,
            Self::Exponential { mean } => mean.is_finite() && mean > 0.0,
            Self::Uniform { min, max } => min.is_finite() && max.is_finite() && min > 0.0 && min <= max,
        };
        if ok {
            Ok(())
        } else {
            Err(SimError::InvalidConfig { reason: format!("{what}: invalid distribution {self:?}") })
        }
    }
}

pub fn interarrival_from(dist: Distribution) -> InterarrivalSampler {
    Box::new(move |rng: &mut DeskRng| dist.sample(rng))
}

/// One distribution per request type, indexed by RequestType::index().
pub fn service_from(per_type: [Distribution; 3]) -> ServiceSampler {
    Box::new(move |kind: RequestType, rng: &mut DeskRng| per_type[kind.index()].sample(rng))
}

/// Draw a request type with a single uniform roll against the mix.
pub fn type_mix(mix: RequestMix) -> TypeSampler {
    Box::new(move |rng: &mut DeskRng| mix.pick(rng.next_f64()))
}

/// Replays `values` in order, then keeps returning the last one.
/// Meant for scripted scenarios; `values` must not be empty.
pub fn scripted(values: Vec<Minutes>) -> InterarrivalSampler {
    let mut it = values.into_iter();
    let mut last = 0.0;
    Box::new(move |_rng: &mut DeskRng| {
        if let Some(v) = it.next() {
            last = v;
        }
        last
    })
}

/// Scripted service durations, in arrival order regardless of type.
pub fn scripted_service(values: Vec<Minutes>) -> ServiceSampler {
    let mut inner = scripted(values);
    Box::new(move |_kind: RequestType, rng: &mut DeskRng| inner(rng))
}

/// Scripted request types; the last one repeats once exhausted.
pub fn scripted_types(types: Vec<RequestType>) -> TypeSampler {
    let mut it = types.into_iter();
    let mut last = RequestType::Generalist;
    Box::new(move |_rng: &mut DeskRng| {
        if let Some(t) = it.next() {
            last = t;
        }
        last
    })
}

/// Reject non-finite or non-positive sampler output.
pub fn checked(what: &'static str, value: Minutes) -> SimResult<Minutes> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidSample { what, value })
    }
}
