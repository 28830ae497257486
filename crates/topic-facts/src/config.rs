use serde::{Deserialize, Serialize};

fn default_candidate_threshold() -> f32 {
    0.3
}

fn default_dedup_similarity() -> f64 {
    0.8
}

fn default_max_facts_per_topic() -> usize {
    50
}

fn default_cached_facts() -> usize {
    20
}

/// Tunables for fact extraction and per-topic aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsConfig {
    /// Sentences must score strictly above this to become facts
    #[serde(default = "default_candidate_threshold")]
    pub candidate_threshold: f32,
    /// Jaccard similarity at or above which two facts are duplicates
    #[serde(default = "default_dedup_similarity")]
    pub dedup_similarity: f64,
    /// Hard cap on facts kept per topic
    #[serde(default = "default_max_facts_per_topic")]
    pub max_facts_per_topic: usize,
    /// How many top facts are cached on the topic document
    #[serde(default = "default_cached_facts")]
    pub cached_facts: usize,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            candidate_threshold: default_candidate_threshold(),
            dedup_similarity: default_dedup_similarity(),
            max_facts_per_topic: default_max_facts_per_topic(),
            cached_facts: default_cached_facts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: FactsConfig = serde_json::from_str("{}").unwrap();
        assert!((config.candidate_threshold - 0.3).abs() < f32::EPSILON);
        assert!((config.dedup_similarity - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.max_facts_per_topic, 50);
        assert_eq!(config.cached_facts, 20);
    }
}
