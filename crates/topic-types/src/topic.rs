//! Topic documents built by the clustering engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::fact::{Fact, FactSummary};
use crate::Embedding;

/// A unique identifier for a topic (ULID).
pub type TopicId = String;

/// A group of related articles about one real-world story.
///
/// Invariants:
/// - `article_ids.len() == article_count`
/// - `centroid` is the arithmetic mean of member embeddings and is
///   recomputed whenever membership changes
/// - a topic with `is_active = false` is a merge tombstone and must
///   never be returned by read paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    /// Generated from the most frequent significant title words
    pub title: String,
    /// Generated description stating the member count
    pub description: String,
    pub category: Category,
    pub region: String,
    /// Member article ids; unique, order not significant
    pub article_ids: Vec<String>,
    /// Distinct source names across members
    pub sources: Vec<String>,
    /// Mean of member embeddings; empty when no member has one
    pub centroid: Embedding,
    pub article_count: usize,
    pub is_active: bool,
    /// Whether the fact cache below is current
    #[serde(default)]
    pub facts_processed: bool,
    pub facts_processed_at: Option<DateTime<Utc>>,
    /// Cached top facts (bounded)
    #[serde(default)]
    pub facts: Vec<Fact>,
    pub fact_summary: Option<FactSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    /// Create a new active topic with no fact cache.
    pub fn new(
        id: TopicId,
        title: impl Into<String>,
        category: Category,
        region: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category,
            region: region.into(),
            article_ids: Vec::new(),
            sources: Vec::new(),
            centroid: Vec::new(),
            article_count: 0,
            is_active: true,
            facts_processed: false,
            facts_processed_at: None,
            facts: Vec::new(),
            fact_summary: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add member ids, keeping the list unique and the count in sync.
    ///
    /// Marks the fact cache stale when membership actually changed.
    pub fn add_members(&mut self, ids: impl IntoIterator<Item = String>) -> usize {
        let mut added = 0;
        for id in ids {
            if !self.article_ids.contains(&id) {
                self.article_ids.push(id);
                added += 1;
            }
        }
        if added > 0 {
            self.article_count = self.article_ids.len();
            self.facts_processed = false;
            self.updated_at = Utc::now();
        }
        added
    }

    /// Add source names, keeping the set unique.
    pub fn add_sources(&mut self, names: impl IntoIterator<Item = String>) {
        for name in names {
            if !name.is_empty() && !self.sources.contains(&name) {
                self.sources.push(name);
            }
        }
    }

    /// Whether the membership invariant holds.
    pub fn membership_consistent(&self) -> bool {
        self.article_ids.len() == self.article_count
    }
}
