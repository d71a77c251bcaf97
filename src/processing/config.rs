use serde::{Deserialize, Serialize};

/// How a row's triaxial reading collapses to a scalar magnitude.
///
/// Two variants exist in recorded deployments: the plain mean of the three
/// axes, and its absolute value. The threshold test uses `Signed` (a
/// negative mean never counts as interaction); `Absolute` is what
/// raw-activity displays plot. Keep the two consumers apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudePolicy {
    Signed,
    Absolute,
}

impl MagnitudePolicy {
    pub fn apply(&self, mean: f64) -> f64 {
        match self {
            MagnitudePolicy::Signed => mean,
            MagnitudePolicy::Absolute => mean.abs(),
        }
    }
}

/// Configuration for the aggregation engine with a tunable threshold.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// A minute counts as interaction when any of its samples has magnitude
    /// strictly greater than this.
    pub threshold: f64,

    /// Magnitude policy used for the threshold comparison.
    pub magnitude_policy: MagnitudePolicy,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            magnitude_policy: MagnitudePolicy::Signed,
        }
    }
}
