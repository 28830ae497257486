//! Article documents written by the external collector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::Embedding;

/// A collected news article.
///
/// Created by the collector with `category = None` and
/// `clustered = false`; the engine fills in the category and, once the
/// article lands in a Topic, sets `clustered` and `topic_id` together.
///
/// Invariant: `topic_id.is_some()` iff `clustered` — an article
/// belongs to at most one active Topic at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Opaque identifier assigned by the collector
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    /// Human-readable source name, e.g. "G1"
    #[serde(default)]
    pub source_name: String,
    /// Source domain, e.g. "g1.globo.com"
    #[serde(default)]
    pub source_domain: String,
    #[serde(default)]
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Region code the article was collected for, e.g. "BR"
    pub region: String,
    /// Language code, e.g. "pt"
    #[serde(default = "default_language")]
    pub language: String,
    /// Embedding produced externally; absent embeddings are tolerated
    /// and handled as singleton topics downstream
    pub embedding: Option<Embedding>,
    /// Assigned by the classifier; None until classified
    pub category: Option<Category>,
    #[serde(default)]
    pub clustered: bool,
    pub topic_id: Option<String>,
}

fn default_language() -> String {
    "pt".to_string()
}

impl Article {
    /// Create an unclassified, unclustered article.
    pub fn new(id: impl Into<String>, title: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            content: String::new(),
            source_name: String::new(),
            source_domain: String::new(),
            url: String::new(),
            published_at: None,
            region: region.into().to_uppercase(),
            language: default_language(),
            embedding: None,
            category: None,
            clustered: false,
            topic_id: None,
        }
    }

    /// Concatenated text of all fields, used for fact extraction.
    pub fn full_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.description.len() + self.content.len() + 2,
        );
        text.push_str(&self.title);
        if !self.description.is_empty() {
            text.push(' ');
            text.push_str(&self.description);
        }
        if !self.content.is_empty() {
            text.push(' ');
            text.push_str(&self.content);
        }
        text
    }

    /// Whether the membership invariant holds.
    pub fn membership_consistent(&self) -> bool {
        self.clustered == self.topic_id.is_some()
    }
}
