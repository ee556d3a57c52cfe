//! Configuration-time selection of a scoring policy.
//!
//! A [`ScoringFunction`] names one policy and its parameters. It is resolved
//! once per merge run into a concrete policy type, so the merge loop itself
//! is monomorphized over the chosen policy.
//!
//! ```json
//! {"function": "quantile_affinity", "quantile": 75}
//! ```

use serde::{Deserialize, Serialize};

use crate::graph::{AffinityMap, RegionGraph, SizeMap};
use crate::merging::{agglomerate, MergeOutcome};
use crate::types::{Score, DEFAULT_BINS};
use super::{
    Const, MaxAffinity, MaxSize, MedianAffinity, MinAffinity, MinSize, QuantileAffinity, Random,
    ScoringError,
};

/// Error in a scoring configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON for a scoring function.
    #[error("Failed to parse scoring configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// Quantile outside `0..=100`.
    #[error("Quantile must be in 0..=100, got {0}")]
    InvalidQuantile(u8),
    /// Constant score is NaN.
    #[error("Constant score must not be NaN")]
    NanConstant,
}

/// The scoring policy to use for a merge run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "snake_case")]
pub enum ScoringFunction {
    /// [`MinSize`]
    MinSize,
    /// [`MaxSize`]
    MaxSize,
    /// [`MinAffinity`]
    MinAffinity,
    /// [`MaxAffinity`]
    MaxAffinity,
    /// [`MedianAffinity`]
    MedianAffinity,
    /// [`QuantileAffinity`] with the default 256 buckets.
    QuantileAffinity {
        /// Target quantile in percent.
        quantile: u8,
    },
    /// [`Random`]; seeded by the operating system when `seed` is absent.
    Random {
        /// Generator seed.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// [`Const`]
    Constant {
        /// Score of every edge.
        value: Score,
    },
}

impl ScoringFunction {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let function: Self = serde_json::from_str(json)?;
        function.validate()?;
        Ok(function)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::QuantileAffinity { quantile } if quantile > 100 => {
                Err(ConfigError::InvalidQuantile(quantile))
            }
            Self::Constant { value } if value.is_nan() => Err(ConfigError::NanConstant),
            _ => Ok(()),
        }
    }

    /// Policy name, as reported by the policy itself.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MinSize => "min_size",
            Self::MaxSize => "max_size",
            Self::MinAffinity => "min_affinity",
            Self::MaxAffinity => "max_affinity",
            Self::MedianAffinity => "median_affinity",
            Self::QuantileAffinity { .. } => "quantile_affinity",
            Self::Random { .. } => "random",
            Self::Constant { .. } => "constant",
        }
    }

    /// Build the configured policy over the given maps and merge `graph`
    /// until the lowest score reaches `threshold`.
    ///
    /// Size policies accumulate into `sizes`; min/max affinity policies write
    /// the collapsed extrema into `affinities`.
    pub fn agglomerate(
        &self,
        graph: RegionGraph,
        affinities: &mut AffinityMap,
        sizes: &mut SizeMap,
        threshold: Score,
    ) -> Result<MergeOutcome, ScoringError> {
        self.validate()?;
        check_len("affinity", graph.num_edges(), affinities.len())?;
        check_len("size", graph.num_nodes(), sizes.len())?;

        let outcome = match *self {
            Self::MinSize => agglomerate(graph, MinSize::new(sizes), threshold),
            Self::MaxSize => agglomerate(graph, MaxSize::new(sizes), threshold),
            Self::MinAffinity => agglomerate(graph, MinAffinity::new(affinities), threshold),
            Self::MaxAffinity => agglomerate(graph, MaxAffinity::new(affinities), threshold),
            Self::MedianAffinity => {
                let scoring = MedianAffinity::new(&graph, affinities);
                agglomerate(graph, scoring, threshold)
            }
            Self::QuantileAffinity { quantile } => {
                let scoring = QuantileAffinity::<DEFAULT_BINS>::new(&graph, affinities, quantile)?;
                agglomerate(graph, scoring, threshold)
            }
            Self::Random { seed: Some(seed) } => agglomerate(graph, Random::seeded(seed), threshold),
            Self::Random { seed: None } => agglomerate(graph, Random::from_entropy(), threshold),
            Self::Constant { value } => agglomerate(graph, Const::new(value), threshold),
        };
        Ok(outcome)
    }
}

fn check_len(map: &'static str, expected: usize, actual: usize) -> Result<(), ScoringError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ScoringError::MapSizeMismatch { map, expected, actual })
    }
}
