//! Sentence scoring, typing, and per-topic aggregation.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use topic_lexicon::{contains_term, FactPatternTable};
use topic_types::{Article, Fact, FactData, FactType};

use crate::config::FactsConfig;
use crate::error::FactsError;
use crate::sentences::split_sentences;

/// Score increments.
const PATTERN_SCORE: f64 = 0.25;
const INDICATOR_SCORE: f64 = 0.3;
const PERCENTAGE_SCORE: f64 = 0.4;
const LARGE_NUMBER_SCORE: f64 = 0.3;
const YEAR_SCORE: f64 = 0.2;
const BOOSTER_SCORE: f64 = 0.1;
const MULTI_PATTERN_BONUS: f64 = 0.2;
const COMMA_BONUS: f64 = 0.1;

/// Sentences shorter than this are never scored.
const MIN_SCORED_CHARS: usize = 20;

/// Rule-based fact extractor.
///
/// All regexes compile once at construction; extraction itself is
/// pure and deterministic.
pub struct FactExtractor {
    config: FactsConfig,
    fact_patterns: Vec<Regex>,
    type_patterns: Vec<(FactType, Regex)>,
    indicators: Vec<String>,
    boosters: Vec<String>,
    stop_words: HashSet<String>,
    percent: Regex,
    large_number: Regex,
    year: Regex,
    age: Regex,
    law: Regex,
    institution: Regex,
}

impl FactExtractor {
    pub fn new(table: FactPatternTable, config: FactsConfig) -> Result<Self, FactsError> {
        let fact_patterns = table
            .fact_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let type_patterns = table
            .type_patterns
            .iter()
            .map(|(t, p)| Ok((*t, Regex::new(p)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            config,
            fact_patterns,
            type_patterns,
            indicators: table.fact_indicators,
            boosters: table.relevance_boosters,
            stop_words: table.dedup_stop_words.into_iter().collect(),
            percent: Regex::new(r"(\d+(?:[.,]\d+)?)\s*[%％]")?,
            large_number: Regex::new(r"\d+(?:[.,]\d+)?\s*(?:mil|milhão|milhões|bilhão|bilhões)\b")?,
            year: Regex::new(r"\b(?:19|20)\d{2}\b")?,
            age: Regex::new(r"(\d+)\s*anos?\b")?,
            law: Regex::new(r"lei\s+(?:federal\s+)?n?º?\s*(\d+(?:/\d+)?)")?,
            institution: Regex::new(
                r"\b(?:ibge|ministério(?:\s+(?:público|da\s+saúde|da\s+educação))?|universidade|instituto)\b",
            )?,
        })
    }

    pub fn config(&self) -> &FactsConfig {
        &self.config
    }

    /// Extract scored facts from one article's text fields.
    pub fn extract_from_article(&self, article: &Article) -> Vec<Fact> {
        let mut facts = Vec::new();
        for sentence in split_sentences(&article.full_text()) {
            let chars = sentence.chars().count();
            if chars < MIN_SCORED_CHARS {
                continue;
            }
            let lower = sentence.to_lowercase();
            let score = self.score_sentence(&lower, chars);
            if score <= self.config.candidate_threshold as f64 {
                continue;
            }
            facts.push(Fact {
                text: sentence.clone(),
                score,
                fact_type: self.classify_sentence(&lower),
                data: self.extract_data(&lower),
                source_article_id: article.id.clone(),
                source_title: article.title.clone(),
                source_url: article.url.clone(),
                source_date: article.published_at,
                length: chars,
                word_count: sentence.split_whitespace().count(),
            });
        }
        debug!(article = %article.id, facts = facts.len(), "extracted article facts");
        facts
    }

    /// Merge fact lists from a topic's members into the topic's ranked,
    /// deduplicated list: score-descending order, near-duplicates
    /// (Jaccard at or above the configured similarity) collapse to the
    /// higher-scored fact, capped at `max_facts_per_topic`.
    pub fn aggregate(&self, mut facts: Vec<Fact>) -> Vec<Fact> {
        facts.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.text.cmp(&b.text))
        });

        let mut kept: Vec<(Fact, HashSet<String>)> = Vec::new();
        for fact in facts {
            let tokens = self.normalize_tokens(&fact.text);
            let duplicate = kept
                .iter()
                .any(|(_, existing)| jaccard(&tokens, existing) >= self.config.dedup_similarity);
            if !duplicate {
                kept.push((fact, tokens));
            }
            if kept.len() >= self.config.max_facts_per_topic {
                break;
            }
        }

        kept.into_iter().map(|(fact, _)| fact).collect()
    }

    fn score_sentence(&self, lower: &str, chars: usize) -> f64 {
        let mut score = 0.0;
        let mut patterns_matched = 0usize;

        for pattern in &self.fact_patterns {
            if pattern.is_match(lower) {
                score += PATTERN_SCORE;
                patterns_matched += 1;
            }
        }
        for phrase in &self.indicators {
            if lower.contains(phrase.as_str()) {
                score += INDICATOR_SCORE;
            }
        }
        if self.percent.is_match(lower) {
            score += PERCENTAGE_SCORE;
        }
        if self.large_number.is_match(lower) {
            score += LARGE_NUMBER_SCORE;
        }
        if self.year.is_match(lower) {
            score += YEAR_SCORE;
        }
        // Boundary-aware so the short booster "tea" cannot fire
        // inside words like "teatro".
        for booster in &self.boosters {
            if contains_term(lower, booster) {
                score += BOOSTER_SCORE;
            }
        }
        if patterns_matched > 1 {
            score += MULTI_PATTERN_BONUS;
        }

        if chars < 50 {
            score *= 0.7;
        } else if chars > 300 {
            score *= 0.8;
        } else if (80..=200).contains(&chars) {
            score *= 1.1;
        }
        if chars > 80 && lower.contains(',') {
            score += COMMA_BONUS;
        }

        score.clamp(0.0, 1.0)
    }

    /// First matching type in precedence order; `Geral` otherwise.
    fn classify_sentence(&self, lower: &str) -> FactType {
        self.type_patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(lower))
            .map(|(fact_type, _)| *fact_type)
            .unwrap_or(FactType::Geral)
    }

    fn extract_data(&self, lower: &str) -> FactData {
        let mut data = FactData::default();

        for capture in self.percent.captures_iter(lower) {
            if let Ok(value) = capture[1].replace(',', ".").parse::<f64>() {
                data.percentages.push(value);
            }
        }
        for m in self.large_number.find_iter(lower) {
            data.large_numbers.push(m.as_str().to_string());
        }
        for m in self.year.find_iter(lower) {
            data.years.push(m.as_str().to_string());
        }
        for capture in self.age.captures_iter(lower) {
            if let Ok(age) = capture[1].parse::<u32>() {
                data.ages.push(age);
            }
        }
        for capture in self.law.captures_iter(lower) {
            data.laws.push(capture[1].to_string());
        }
        for m in self.institution.find_iter(lower) {
            data.institutions.push(m.as_str().to_string());
        }

        data
    }

    /// Lowercased alphanumeric tokens longer than 2 chars, stop-words
    /// removed. The comparison basis for duplicate detection.
    fn normalize_tokens(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() > 2 && !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        // Both token sets empty: treat as identical.
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use topic_lexicon::FactPatternTable;

    fn extractor() -> FactExtractor {
        FactExtractor::new(FactPatternTable::default(), FactsConfig::default())
            .expect("default patterns compile")
    }

    fn article_with(content: &str) -> Article {
        let mut article = Article::new("a1", "Título de teste", "BR");
        article.content = content.to_string();
        article
    }

    #[test]
    fn test_statistical_sentence_becomes_fact() {
        let facts = extractor().extract_from_article(&article_with(
            "O estudo revela que 30% das crianças diagnosticadas receberam atendimento em 2023, \
             segundo dados do IBGE.",
        ));
        assert_eq!(facts.len(), 1);
        let fact = &facts[0];
        assert!(fact.score > 0.3);
        assert_eq!(fact.fact_type, FactType::Estatistica);
        assert_eq!(fact.data.percentages, vec![30.0]);
        assert_eq!(fact.data.years, vec!["2023".to_string()]);
        assert!(fact.data.institutions.iter().any(|i| i == "ibge"));
    }

    #[test]
    fn test_law_citation_is_typed_and_extracted() {
        let facts = extractor().extract_from_article(&article_with(
            "A Lei nº 12764/2012 garante atendimento às pessoas com transtorno do espectro autista.",
        ));
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].fact_type, FactType::Legislacao);
        assert_eq!(facts[0].data.laws, vec!["12764/2012".to_string()]);
    }

    #[test]
    fn test_short_booster_needs_word_boundary() {
        // "teatro" must not trigger the "tea" booster: one weak
        // pattern match alone stays under the candidate threshold.
        let facts = extractor().extract_from_article(&article_with(
            "Estudo aponta melhora no acesso ao teatro para o público.",
        ));
        assert!(facts.is_empty());

        // The same booster still fires on the standalone word.
        let facts = extractor().extract_from_article(&article_with(
            "Estudo aponta avanços no tratamento de pessoas com TEA.",
        ));
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn test_plain_sentence_is_not_a_fact() {
        let facts = extractor().extract_from_article(&article_with(
            "A reunião aconteceu na sede da prefeitura durante a tarde de ontem.",
        ));
        assert!(facts.is_empty());
    }

    #[test]
    fn test_short_sentences_skipped() {
        let mut article = article_with("Dados de 2023.");
        article.title = String::new();
        let facts = extractor().extract_from_article(&article);
        assert!(facts.is_empty());
    }

    #[test]
    fn test_large_number_phrase_extracted() {
        let facts = extractor().extract_from_article(&article_with(
            "Pesquisa revela que 2 milhões de brasileiros estão no espectro autista.",
        ));
        assert_eq!(facts.len(), 1);
        assert!(facts[0]
            .data
            .large_numbers
            .iter()
            .any(|n| n.contains("milhões")));
    }

    #[test]
    fn test_aggregate_dedups_near_identical_texts() {
        let ex = extractor();
        let a = article_with(
            "Dados mostram que 30% das crianças autistas recebem atendimento adequado nas escolas.",
        );
        let b = article_with(
            "Dados mostram que 30% das crianças autistas recebem o atendimento adequado nas escolas!",
        );
        let mut facts = ex.extract_from_article(&a);
        facts.extend(ex.extract_from_article(&b));
        assert_eq!(facts.len(), 2);

        let aggregated = ex.aggregate(facts);
        assert_eq!(aggregated.len(), 1);
    }

    #[test]
    fn test_aggregate_sorts_by_score_and_caps() {
        let ex = extractor();
        let mut facts = Vec::new();
        for i in 0..60 {
            facts.push(Fact {
                text: format!("Levantamento regional{} aponta crescimento distinto", i),
                score: (i as f64) / 100.0,
                fact_type: FactType::Pesquisa,
                data: FactData::default(),
                source_article_id: format!("a{}", i),
                source_title: String::new(),
                source_url: String::new(),
                source_date: None,
                length: 40,
                word_count: 6,
            });
        }
        let aggregated = ex.aggregate(facts);
        assert_eq!(aggregated.len(), 50);
        for pair in aggregated.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let ex = extractor();
        let article = article_with(
            "Segundo especialistas, o censo de 2022 registrou aumento de 25% nos diagnósticos.",
        );
        let first = ex.extract_from_article(&article);
        let second = ex.extract_from_article(&article);
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].text, second[0].text);
        assert!((first[0].score - second[0].score).abs() < f64::EPSILON);
    }
}
