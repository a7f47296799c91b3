use crate::kmeans::{DEFAULT_CLUSTERS, DEFAULT_MAX_ITERATIONS};
use crate::rng::DEFAULT_SEED;
use crate::sample::{DEFAULT_SAMPLE_SIZE, MAX_SAMPLE_SIZE};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum InvalidConfigError {
    #[snafu(display("sample size must be between 1 and {MAX_SAMPLE_SIZE}, got {sample_size}"))]
    SampleSizeOutOfRange { sample_size: u32 },
}

/// Tuning knobs for [`crate::analyze_with_config`]. Missing fields fall back to
/// their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Side of the square grid the image is resampled to before clustering,
    /// at most [`MAX_SAMPLE_SIZE`]. Larger values are clamped by the analysis.
    pub sample_size: u32,
    /// Number of palette clusters, at most [`crate::MAX_CLUSTERS`].
    pub clusters: usize,
    /// Seed for the centroid initialization.
    pub seed: u64,
    pub max_iterations: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            clusters: DEFAULT_CLUSTERS,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl AnalysisConfig {
    /// Reject settings the analysis would otherwise silently clamp.
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        ensure!(
            (1..=MAX_SAMPLE_SIZE).contains(&self.sample_size),
            SampleSizeOutOfRangeSnafu {
                sample_size: self.sample_size,
            }
        );
        Ok(())
    }
}
