//! Clustering configuration and the batch-size scaling policy.

use serde::{Deserialize, Serialize};

fn default_small_batch_limit() -> usize {
    10
}

fn default_eps_small() -> f32 {
    0.10
}

fn default_eps_large() -> f32 {
    0.15
}

fn default_min_samples_small() -> usize {
    2
}

fn default_min_samples_large() -> usize {
    3
}

/// Tunables for the density clustering pass.
///
/// Small batches get a tighter radius and a lower neighbor minimum:
/// with only a handful of points, the looser large-batch settings
/// classify everything as noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Batches at or below this size use the small-batch parameters
    #[serde(default = "default_small_batch_limit")]
    pub small_batch_limit: usize,
    /// Cosine-distance radius for small batches
    #[serde(default = "default_eps_small")]
    pub eps_small: f32,
    /// Cosine-distance radius for large batches
    #[serde(default = "default_eps_large")]
    pub eps_large: f32,
    /// Minimum other-point neighbors for a core point, small batches
    #[serde(default = "default_min_samples_small")]
    pub min_samples_small: usize,
    /// Minimum other-point neighbors for a core point, large batches
    #[serde(default = "default_min_samples_large")]
    pub min_samples_large: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            small_batch_limit: default_small_batch_limit(),
            eps_small: default_eps_small(),
            eps_large: default_eps_large(),
            min_samples_small: default_min_samples_small(),
            min_samples_large: default_min_samples_large(),
        }
    }
}

/// Resolved parameters for one clustering invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    pub eps: f32,
    pub min_samples: usize,
}

impl ClusterParams {
    /// Scale parameters to the batch size. Deterministic for a fixed
    /// batch size and config.
    pub fn for_batch(batch_size: usize, config: &ClusterConfig) -> Self {
        if batch_size <= config.small_batch_limit {
            Self {
                eps: config.eps_small,
                min_samples: config.min_samples_small,
            }
        } else {
            Self {
                eps: config.eps_large,
                min_samples: config.min_samples_large,
            }
        }
    }
}
