//! Weighted keyword classifier.

use topic_lexicon::{contains_term, Lexicon};
use topic_types::{Article, Category};
use tracing::debug;

/// Weight applied to keyword hits in the title during the generic scan.
const TITLE_WEIGHT: u32 = 3;
/// Weight applied to keyword hits in the description during the generic scan.
const DESCRIPTION_WEIGHT: u32 = 2;
/// Weight applied to keyword hits in the body during the generic scan.
const CONTENT_WEIGHT: u32 = 1;
/// Minimum generic-scan score for a category to win.
const GENERIC_THRESHOLD: u32 = 3;

/// Classifies article text against a [`Lexicon`].
///
/// The pipeline runs in a fixed order: relevance gate, phrase groups,
/// priority rules, generic weighted scan, then fallbacks. The first
/// stage that produces a verdict wins.
pub struct Classifier {
    lexicon: Lexicon,
}

impl Classifier {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify an article by its text fields.
    pub fn classify_article(&self, article: &Article) -> Category {
        self.classify(&article.title, &article.description, &article.content)
    }

    /// Classify raw text. Pure: no state is read or written besides the
    /// lexicon tables, so the same input always yields the same category.
    pub fn classify(&self, title: &str, description: &str, content: &str) -> Category {
        let title = title.to_lowercase();
        let description = description.to_lowercase();
        let content = content.to_lowercase();

        let headline = format!("{} {}", title, description);
        let text = format!("{} {}", headline, content);

        if text.trim().is_empty() {
            return Category::Irrelevante;
        }
        if !self.is_relevant(&text) {
            return Category::Irrelevante;
        }

        // Phrase groups: a single curated phrase is a strong enough
        // signal to decide the category outright.
        for group in &self.lexicon.phrase_groups {
            let hits = count_hits(&text, &group.phrases);
            if hits * group.phrase_score >= group.threshold {
                debug!(category = group.category.id(), hits, "phrase group matched");
                return group.category;
            }
        }

        // Priority rules, in declaration order. Headline hits are
        // weighted up so a category named in the title wins even when
        // the body barely mentions it.
        for rule in &self.lexicon.priority_rules {
            let terms = self.lexicon.terms_for(rule.category);
            let score =
                count_hits(&headline, terms) * rule.headline_weight + count_hits(&text, terms);
            if score < rule.threshold {
                continue;
            }
            if !rule.requires_any.is_empty() && count_hits(&text, &rule.requires_any) == 0 {
                continue;
            }
            if rule.requires_subject && !self.mentions_subject(&text) {
                continue;
            }
            debug!(category = rule.category.id(), score, "priority rule matched");
            return rule.category;
        }

        // Generic weighted scan. Categories owned by an exclusive rule
        // were settled above; strict greater-than keeps the earliest
        // declared category on ties.
        let exclusive: Vec<Category> = self
            .lexicon
            .priority_rules
            .iter()
            .filter(|r| r.exclusive)
            .map(|r| r.category)
            .collect();
        let mut best: Option<(Category, u32)> = None;
        for entry in &self.lexicon.categories {
            if exclusive.contains(&entry.category) {
                continue;
            }
            let score = count_hits(&title, &entry.terms) * TITLE_WEIGHT
                + count_hits(&description, &entry.terms) * DESCRIPTION_WEIGHT
                + count_hits(&content, &entry.terms) * CONTENT_WEIGHT;
            if score >= GENERIC_THRESHOLD && best.map_or(true, |(_, top)| score > top) {
                best = Some((entry.category, score));
            }
        }
        if let Some((category, score)) = best {
            debug!(category = category.id(), score, "generic scan matched");
            return category;
        }

        // Fallbacks for relevant articles without a keyword-table win.
        if self.mentions_subject(&text) {
            if count_hits(&text, &self.lexicon.fallback_research_terms) > 0 {
                return Category::PesquisaEstatistica;
            }
            if count_hits(&text, &self.lexicon.fallback_rights_terms) > 0 {
                return Category::DireitosLegislacao;
            }
        }

        Category::Outros
    }

    /// Relevance gate: domain allow-list hit with no deny-list hit, or
    /// the statistics path (research vocabulary plus a subject mention).
    fn is_relevant(&self, text: &str) -> bool {
        let required = count_hits(text, &self.lexicon.required_terms) > 0;
        let denied = count_hits(text, &self.lexicon.irrelevant_terms) > 0;
        if required && !denied {
            return true;
        }
        let research = self.lexicon.terms_for(Category::PesquisaEstatistica);
        count_hits(text, research) > 0 && self.mentions_subject(text)
    }

    fn mentions_subject(&self, text: &str) -> bool {
        count_hits(text, &self.lexicon.subject_terms) > 0
    }
}

fn count_hits(text: &str, terms: &[String]) -> u32 {
    terms.iter().filter(|term| contains_term(text, term)).count() as u32
}
