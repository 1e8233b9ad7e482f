use crate::{
    error::{SimError, SimResult},
    job::RequestType,
    rng::DEFAULT_SEED,
    sampling::Distribution,
    types::Minutes,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatorCounts {
    pub primary:    usize,
    pub secondary:  usize,
    pub generalist: usize,
}

/// Share of arrivals per request type. Generalist gets the remainder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RequestMix {
    pub primary:   f64,
    pub secondary: f64,
}

impl Default for RequestMix {
    fn default() -> Self {
        Self { primary: 0.70, secondary: 0.20 }
    }
}

impl RequestMix {
    /// Map a uniform draw in [0, 1) onto a request type.
    pub fn pick(&self, u: f64) -> RequestType {
        if u < self.primary {
            RequestType::Primary
        } else if u < self.primary + self.secondary {
            RequestType::Secondary
        } else {
            RequestType::Generalist
        }
    }
}

/// Excess-wait drop rule for Primary and Secondary backlogs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SlaPolicy {
    /// Projected waits strictly above this are eligible for dropping.
    pub wait_threshold_minutes: Minutes,
    /// A draw strictly below this drops the job.
    pub drop_probability:       f64,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self {
            wait_threshold_minutes: 30.0,
            drop_probability:       0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceDistributions {
    pub primary:    Distribution,
    pub secondary:  Distribution,
    pub generalist: Distribution,
}

impl ServiceDistributions {
    pub fn as_array(&self) -> [Distribution; 3] {
        [self.primary.clone(), self.secondary.clone(), self.generalist.clone()]
    }
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeskConfig {
    pub operators:    OperatorCounts,
    #[serde(default = "default_seed")]
    pub seed:         u64,
    #[serde(default)]
    pub request_mix:  RequestMix,
    #[serde(default)]
    pub sla:          SlaPolicy,
    pub interarrival: Distribution,
    pub service:      ServiceDistributions,
    /// Forward every engine event to `log::debug!`.
    #[serde(default)]
    pub debug:        bool,
}

impl DeskConfig {
    /// Load and validate a JSON config file.
    /// In tests, use DeskConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        let mix = self.request_mix;
        let finite = mix.primary.is_finite() && mix.secondary.is_finite();
        if !finite || mix.primary < 0.0 || mix.secondary < 0.0 || mix.primary + mix.secondary > 1.0 {
            return Err(SimError::InvalidConfig {
                reason: format!("request_mix must be non-negative and sum to <= 1, got {mix:?}"),
            });
        }
        if !(0.0..=1.0).contains(&self.sla.drop_probability) {
            return Err(SimError::InvalidConfig {
                reason: format!("sla.drop_probability out of [0, 1]: {}", self.sla.drop_probability),
            });
        }
        if !self.sla.wait_threshold_minutes.is_finite() || self.sla.wait_threshold_minutes < 0.0 {
            return Err(SimError::InvalidConfig {
                reason: format!("sla.wait_threshold_minutes invalid: {}", self.sla.wait_threshold_minutes),
            });
        }
        self.interarrival.validate("interarrival")?;
        self.service.primary.validate("service.primary")?;
        self.service.secondary.validate("service.secondary")?;
        self.service.generalist.validate("service.generalist")?;
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            operators: OperatorCounts { primary: 3, secondary: 2, generalist: 1 },
            seed: DEFAULT_SEED,
            request_mix: RequestMix::default(),
            sla: SlaPolicy::default(),
            interarrival: Distribution::Exponential { mean: 6.0 },
            service: ServiceDistributions {
                primary:    Distribution::Exponential { mean: 15.0 },
                secondary:  Distribution::Exponential { mean: 25.0 },
                generalist: Distribution::Uniform { min: 10.0, max: 60.0 },
            },
            debug: false,
        }
    }
}
