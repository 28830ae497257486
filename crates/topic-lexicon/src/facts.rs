//! Pattern tables for the fact extractor.

use serde::{Deserialize, Serialize};
use topic_types::FactType;

fn strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

/// Regex and keyword tables driving fact scoring and typing.
///
/// Regexes are stored as source strings; `topic-facts` compiles them
/// once at extractor construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactPatternTable {
    /// Statistic/legislation/research patterns; each match adds a
    /// fixed score increment
    pub fact_patterns: Vec<String>,
    /// Reporting-verb phrases that signal a factual sentence
    pub fact_indicators: Vec<String>,
    /// Domain keywords that nudge the score up per hit
    pub relevance_boosters: Vec<String>,
    /// Ordered (type, pattern) table; first match wins
    pub type_patterns: Vec<(FactType, String)>,
    /// Stop-words removed before duplicate comparison
    pub dedup_stop_words: Vec<String>,
}

impl Default for FactPatternTable {
    fn default() -> Self {
        Self {
            fact_patterns: strings(&[
                r"\d+[%％][\s\w]*(?:dos|das|de|em|entre)[\s\w]*(?:casos|pessoas|crianças|autistas)",
                r"(?:apenas|somente|cerca de|aproximadamente)?\s*\d+[%％]",
                r"\d+(?:\.\d+)?\s*(?:milhões?|mil|bilhões?)\s*de\s*(?:pessoas|crianças|brasileiros)",
                r"(?:antes dos?|após os?|até os?)\s*\d+\s*anos?",
                r"em\s*\d{4}(?:,\s*\d+[%％])?",
                r"(?:desde|a partir de)\s*\d{4}",
                r"(?:cresceu|aumentou|subiu|diminuiu|reduziu)\s*(?:em\s*)?\d+[%％]",
                r"(?:mais|menos)\s*(?:de\s*)?\d+[%％]",
                r"lei\s+(?:federal\s+)?n?º?\s*\d+(?:/\d+)?",
                r"(?:estudo|pesquisa|levantamento)[\s\w]*(?:revela|mostra|indica|aponta)",
                r"(?:segundo|conforme|de acordo com)\s+(?:a\s+)?(?:pesquisa|estudo)",
                r"(?:dados|estatísticas)\s+(?:mostram|revelam|indicam)",
            ]),
            fact_indicators: strings(&[
                "dados mostram",
                "pesquisa revela",
                "estudo indica",
                "estatísticas apontam",
                "levantamento mostra",
                "censo revela",
                "segundo especialistas",
                "de acordo com",
                "conforme dados",
                "ibge divulga",
                "ministério informa",
                "pesquisadores descobriram",
                "análise revela",
            ]),
            relevance_boosters: strings(&[
                "autismo",
                "tea",
                "autista",
                "espectro autista",
                "neurodiversidade",
                "inclusão",
                "diagnóstico",
                "terapia",
                "tratamento",
                "educação especial",
            ]),
            type_patterns: vec![
                (FactType::Estatistica, r"\d+[%％]".to_string()),
                (
                    FactType::Legislacao,
                    r"lei|legislação|projeto|decreto|portaria".to_string(),
                ),
                (
                    FactType::Pesquisa,
                    r"estudo|pesquisa|levantamento|descoberta".to_string(),
                ),
                (
                    FactType::Saude,
                    r"tratamento|terapia|diagnóstico|medicamento".to_string(),
                ),
                (
                    FactType::Educacao,
                    r"educação|escola|ensino|professor|aluno".to_string(),
                ),
                (
                    FactType::Violencia,
                    r"violência|agressão|discriminação|bullying".to_string(),
                ),
                (
                    FactType::Direitos,
                    r"direito|inclusão|acessibilidade|benefício".to_string(),
                ),
                (FactType::Temporal, r"\d{4}|\bano\b|\banos\b|desde|até".to_string()),
                (FactType::Censo, r"censo|ibge|dados oficiais".to_string()),
            ],
            dedup_stop_words: strings(&[
                "o", "a", "os", "as", "de", "do", "da", "dos", "das", "em", "no", "na", "nos",
                "nas", "para", "por", "com", "um", "uma", "uns", "umas", "e", "ou", "mas", "que",
                "se", "é", "são", "foi", "foram", "tem", "têm",
            ]),
        }
    }
}
