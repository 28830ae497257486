//! Extracted facts and their topic-level summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse type of an extracted fact.
///
/// Declaration order is the tagging precedence: the extractor assigns
/// the first type whose pattern matches the sentence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FactType {
    Estatistica,
    Legislacao,
    Pesquisa,
    Saude,
    Educacao,
    Violencia,
    Direitos,
    Temporal,
    Censo,
    Geral,
}

impl FactType {
    /// Stable string id used in summaries and external payloads.
    pub fn id(&self) -> &'static str {
        match self {
            FactType::Estatistica => "estatistica",
            FactType::Legislacao => "legislacao",
            FactType::Pesquisa => "pesquisa",
            FactType::Saude => "saude",
            FactType::Educacao => "educacao",
            FactType::Violencia => "violencia",
            FactType::Direitos => "direitos",
            FactType::Temporal => "temporal",
            FactType::Censo => "censo",
            FactType::Geral => "geral",
        }
    }
}

/// Structured values pulled out of a fact sentence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FactData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub percentages: Vec<f64>,
    /// Large-number phrases as written, e.g. "2 milhões"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub large_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ages: Vec<u32>,
    /// Law citation numbers, e.g. "12764/2012"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub laws: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub institutions: Vec<String>,
}

impl FactData {
    /// Whether any structured value was extracted.
    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
            && self.large_numbers.is_empty()
            && self.years.is_empty()
            && self.ages.is_empty()
            && self.laws.is_empty()
            && self.institutions.is_empty()
    }
}

/// A scored, typed sentence believed to carry a factual claim.
///
/// Facts are derived data: they are regenerated in full from the
/// source articles on every processing pass, never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub text: String,
    /// Relevance score in [0, 1]
    pub score: f64,
    pub fact_type: FactType,
    #[serde(default)]
    pub data: FactData,
    /// Provenance
    pub source_article_id: String,
    pub source_title: String,
    pub source_url: String,
    pub source_date: Option<DateTime<Utc>>,
    pub length: usize,
    pub word_count: usize,
}

/// Aggregate statistics over a topic's fact list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FactSummary {
    pub total_facts: usize,
    /// Count per fact type id; BTreeMap for deterministic ordering
    pub fact_types: BTreeMap<String, usize>,
    pub avg_score: f64,
    pub top_score: f64,
    pub has_statistics: bool,
    pub has_research: bool,
    pub has_legislation: bool,
    pub facts_with_structured_data: usize,
    /// Fraction of facts carrying structured data, as a percentage
    pub coverage_percentage: f64,
}

impl FactSummary {
    /// Compute the summary for a fact list.
    pub fn from_facts(facts: &[Fact]) -> Self {
        if facts.is_empty() {
            return Self::default();
        }

        let mut fact_types: BTreeMap<String, usize> = BTreeMap::new();
        for fact in facts {
            *fact_types.entry(fact.fact_type.id().to_string()).or_insert(0) += 1;
        }

        let total = facts.len();
        let sum: f64 = facts.iter().map(|f| f.score).sum();
        let top = facts.iter().map(|f| f.score).fold(0.0f64, f64::max);
        let with_data = facts.iter().filter(|f| !f.data.is_empty()).count();

        Self {
            total_facts: total,
            fact_types,
            avg_score: sum / total as f64,
            top_score: top,
            has_statistics: facts.iter().any(|f| f.fact_type == FactType::Estatistica),
            has_research: facts.iter().any(|f| f.fact_type == FactType::Pesquisa),
            has_legislation: facts.iter().any(|f| f.fact_type == FactType::Legislacao),
            facts_with_structured_data: with_data,
            coverage_percentage: (with_data as f64 / total as f64) * 100.0,
        }
    }
}
