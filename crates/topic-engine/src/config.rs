//! Engine configuration.

use serde::{Deserialize, Serialize};

use topic_cluster::ClusterConfig;
use topic_facts::FactsConfig;

fn default_similarity_threshold() -> f32 {
    0.9
}

fn default_max_passes() -> usize {
    10
}

/// Tunables for the topic merge pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Centroid similarity at or above which two topics merge.
    /// Stricter than the clustering radius: merging is coarser and
    /// lower-frequency.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Upper bound on merge passes before declaring a fixpoint
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_passes: default_max_passes(),
        }
    }
}

fn default_min_interval_minutes() -> i64 {
    10
}

fn default_max_articles() -> usize {
    500
}

/// Tunables for run pacing and batch size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// A non-forced run is skipped when a completed run for the region
    /// finished less than this many minutes ago
    #[serde(default = "default_min_interval_minutes")]
    pub min_interval_minutes: i64,
    /// Most articles pulled into one run, newest first
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            min_interval_minutes: default_min_interval_minutes(),
            max_articles: default_max_articles(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub facts: FactsConfig,
    #[serde(default)]
    pub run: RunConfig,
}
