//! Category keyword tables, the relevance allow/deny lists, phrase
//! groups, and priority rules.

use serde::{Deserialize, Serialize};
use topic_types::Category;

fn strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

/// Keyword set for one category. Order of the containing list is the
/// classifier's tie-break order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTerms {
    pub category: Category,
    pub terms: Vec<String>,
}

/// A curated multi-word phrase set that short-circuits classification.
///
/// Short lexical overlap alone is a weak signal for these sensitive
/// categories, so full-phrase matches carry a high fixed score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseGroup {
    pub category: Category,
    pub phrases: Vec<String>,
    /// Score awarded per matched phrase
    pub phrase_score: u32,
    /// Accumulated score at which the category wins immediately
    pub threshold: u32,
}

/// A priority category evaluated before the generic weighted scan.
///
/// Keyword hits in title+description count at `headline_weight`, hits
/// in the full text at 1. The rule fires only when the score reaches
/// `threshold` AND, when `requires_any` is non-empty, at least one of
/// those terms co-occurs in the text (guards against false positives
/// from generic words).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityRule {
    pub category: Category,
    pub headline_weight: u32,
    pub threshold: u32,
    #[serde(default)]
    pub requires_any: Vec<String>,
    /// When true the rule additionally requires a domain-subject mention
    #[serde(default)]
    pub requires_subject: bool,
    /// When true the category is decided by this rule alone and is
    /// skipped in the generic weighted scan
    #[serde(default)]
    pub exclusive: bool,
}

/// The full lexicon: everything the classifier needs, as data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    /// Bumped whenever the compiled-in tables change
    pub version: u32,
    /// Ordered category keyword tables
    pub categories: Vec<CategoryTerms>,
    /// Domain allow-list: at least one required for relevance
    pub required_terms: Vec<String>,
    /// Deny-list of off-domain vocabulary
    pub irrelevant_terms: Vec<String>,
    /// Direct domain-subject mentions (the secondary admission path
    /// and priority-rule co-occurrence guard)
    pub subject_terms: Vec<String>,
    /// Phrase groups checked before any keyword scoring
    pub phrase_groups: Vec<PhraseGroup>,
    /// Priority rules, in evaluation order
    pub priority_rules: Vec<PriorityRule>,
    /// Last-resort research terms (combined with a subject mention)
    pub fallback_research_terms: Vec<String>,
    /// Last-resort rights terms (combined with a subject mention)
    pub fallback_rights_terms: Vec<String>,
    /// Stop-list for topic title generation
    pub title_stop_words: Vec<String>,
}

impl Lexicon {
    /// Keyword table for one category, if present.
    pub fn terms_for(&self, category: Category) -> &[String] {
        self.categories
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.terms.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            version: 3,
            categories: default_categories(),
            required_terms: strings(&[
                "autis",
                "tea",
                "transtorno do espectro autista",
                "neurodiversidade",
                "neurodivergente",
                "síndrome de asperger",
                "transtorno invasivo do desenvolvimento",
                "transtorno global do desenvolvimento",
                "condição do espectro autista",
                "pessoa com deficiência",
                "criança com deficiência",
                "criança especial",
                "necessidades especiais",
                "deficiência intelectual",
                "transtorno do desenvolvimento",
                "condição do neurodesenvolvimento",
                "aluno com deficiência",
                "aluno especial",
                "estudante com deficiência",
                "vítima de bullying",
                "vítima de discriminação",
                "vítima de maus-tratos",
                "conselho tutelar",
                "vara da infância",
                "ação civil pública",
                "responsabilidade da escola",
                "denúncia contra escola",
            ]),
            irrelevant_terms: strings(&[
                "futebol",
                "campeonato",
                "seleção",
                "celebridade",
                "novela",
                "reality show",
                "big brother",
                "bbb",
                "gastronomia",
                "receita",
                "turismo",
                "maquiagem",
                "fórmula 1",
                "automobilismo",
                "eleições",
                "candidato",
                "partido",
                "hollywood",
                "fofoca",
            ]),
            subject_terms: strings(&["autis", "tea", "transtorno do espectro autista"]),
            phrase_groups: default_phrase_groups(),
            priority_rules: default_priority_rules(),
            fallback_research_terms: strings(&[
                "pesquisa",
                "estudo",
                "levantamento",
                "dados",
                "estatística",
                "censo",
            ]),
            fallback_rights_terms: strings(&[
                "direito",
                "lei",
                "legislação",
                "projeto de lei",
                "proposta",
            ]),
            title_stop_words: strings(&[
                "para", "sobre", "como", "após", "mais", "menos", "pelo", "pela", "seus",
                "suas", "este", "esta", "isso", "pode", "deve", "será", "entre", "ainda",
                "anos", "diz", "tem", "vai",
            ]),
        }
    }
}

fn default_categories() -> Vec<CategoryTerms> {
    vec![
        CategoryTerms {
            category: Category::SaudeTratamento,
            terms: strings(&[
                "terapia ocupacional",
                "fonoaudiologia",
                "psicólogo infantil",
                "neuropediatra",
                "intervenção precoce",
                "tratamento tea",
                "terapia aba",
                "integração sensorial",
                "saúde mental",
                "acompanhamento multidisciplinar",
                "desenvolvimento infantil",
                "neurodesenvolvimento",
                "medicamento",
                "medicação",
                "remédio",
                "anvisa",
                "ministério da saúde",
                "ensaio clínico",
                "eficácia",
                "efeito colateral",
                "dosagem",
                "prescrição",
                "neurologista",
                "psiquiatra",
                "diagnóstico",
                "comorbidade",
            ]),
        },
        CategoryTerms {
            category: Category::EducacaoInclusiva,
            terms: strings(&[
                "educação especial",
                "sala de recursos",
                "professor de apoio",
                "plano educacional individualizado",
                "adaptação curricular",
                "escola inclusiva",
                "inclusão escolar",
                "educação inclusiva",
                "atendimento educacional especializado",
                "ensino regular",
                "material adaptado",
                "mediador escolar",
                "profissional de apoio",
                "acompanhante especializado",
                "sala sensorial",
                "alfabetização",
                "formação de professores",
            ]),
        },
        CategoryTerms {
            category: Category::DireitosLegislacao,
            terms: strings(&[
                "lei berenice piana",
                "estatuto da pessoa com deficiência",
                "direitos trabalhistas",
                "benefício assistencial",
                "loas",
                "isenção de impostos",
                "direito à educação",
                "direitos autistas",
                "políticas públicas",
                "conselhos de direitos",
            ]),
        },
        CategoryTerms {
            category: Category::ViolenciaDiscriminacao,
            terms: strings(&[
                "bullying",
                "agressão",
                "violência",
                "maus-tratos",
                "abuso",
                "assédio",
                "humilhação",
                "ameaça",
                "intimidação",
                "preconceito",
                "discriminação",
                "exclusão",
                "segregação",
                "negligência",
                "estigmatização",
                "capacitismo",
                "barreira atitudinal",
                "violência escolar",
                "bullying escolar",
                "escola processada",
                "processo judicial",
                "danos morais",
                "ministério público",
                "conselho tutelar",
            ]),
        },
        CategoryTerms {
            category: Category::TecnologiaAssistiva,
            terms: strings(&[
                "comunicação alternativa",
                "caa",
                "aplicativo autismo",
                "software educacional",
                "dispositivo adaptado",
                "tecnologia inclusiva",
                "recursos de acessibilidade",
                "comunicação suplementar",
            ]),
        },
        CategoryTerms {
            category: Category::PesquisaCientifica,
            terms: strings(&[
                "estudo científico",
                "pesquisa autismo",
                "neurociência",
                "genética autismo",
                "ensaios clínicos",
                "artigo científico",
                "descoberta científica",
                "pesquisa médica",
            ]),
        },
        CategoryTerms {
            category: Category::FamiliaCuidadores,
            terms: strings(&[
                "relato de mãe",
                "relato de pai",
                "cuidadores",
                "rede de apoio",
                "maternidade atípica",
                "paternidade atípica",
                "grupo de apoio",
                "desafios familiares",
                "sobrecarga",
                "esgotamento",
                "rotina familiar",
                "dinâmica familiar",
                "família atípica",
                "família neurodiversa",
                "qualidade de vida",
                "apoio emocional",
                "acolhimento",
            ]),
        },
        CategoryTerms {
            category: Category::MercadoTrabalho,
            terms: strings(&[
                "inclusão profissional",
                "empregabilidade",
                "treinamento profissional",
                "empresas inclusivas",
                "leis trabalhistas",
                "qualificação profissional",
                "mercado de trabalho",
                "oportunidades de emprego",
            ]),
        },
        CategoryTerms {
            category: Category::CulturaLazer,
            terms: strings(&[
                "evento inclusivo",
                "atividades recreativas",
                "esportes adaptados",
                "oficinas culturais",
                "teatro acessível",
                "cinema inclusivo",
                "atividades lúdicas",
                "lazer adaptado",
            ]),
        },
        CategoryTerms {
            category: Category::PesquisaEstatistica,
            terms: strings(&[
                "pesquisa",
                "estudo",
                "levantamento",
                "dados",
                "estatística",
                "censo",
                "pesquisadores",
                "cientistas",
                "universidade",
                "instituição de pesquisa",
                "ibge",
                "dados oficiais",
                "relatório",
                "análise estatística",
                "estudo acadêmico",
                "publicação científica",
                "revista científica",
                "metanálise",
                "revisão sistemática",
                "coleta de dados",
                "resultados de pesquisa",
            ]),
        },
    ]
}

fn default_phrase_groups() -> Vec<PhraseGroup> {
    vec![
        PhraseGroup {
            category: Category::SaudeTratamento,
            phrases: strings(&[
                "novo medicamento",
                "nova medicação",
                "novo tratamento",
                "nova terapia",
                "aprovação de medicamento",
                "liberação de medicamento",
                "estudo de medicamento",
                "ensaio clínico",
                "benefícios do tratamento",
                "eficácia do tratamento",
            ]),
            phrase_score: 15,
            threshold: 15,
        },
        PhraseGroup {
            category: Category::FamiliaCuidadores,
            phrases: strings(&[
                "desafios dos pais",
                "desafios das mães",
                "desafios das famílias",
                "dificuldades dos cuidadores",
                "sobrecarga dos cuidadores",
                "estresse dos pais",
                "experiência parental",
                "rotina familiar",
                "impacto na família",
                "impacto no dia a dia",
            ]),
            phrase_score: 15,
            threshold: 15,
        },
        PhraseGroup {
            category: Category::ViolenciaDiscriminacao,
            phrases: strings(&[
                "tratamento diferenciado",
                "olhares diferentes",
                "comentários inapropriados",
                "falta de compreensão",
                "falta de empatia",
                "falta de inclusão",
                "barreira atitudinal",
                "não aceitação",
                "exclusão social",
                "isolamento social",
            ]),
            phrase_score: 15,
            threshold: 15,
        },
    ]
}

fn default_priority_rules() -> Vec<PriorityRule> {
    vec![
        PriorityRule {
            category: Category::ViolenciaDiscriminacao,
            headline_weight: 10,
            threshold: 3,
            requires_any: Vec::new(),
            requires_subject: false,
            exclusive: true,
        },
        PriorityRule {
            category: Category::DireitosLegislacao,
            headline_weight: 5,
            threshold: 5,
            requires_any: strings(&["direito"]),
            requires_subject: false,
            exclusive: true,
        },
        PriorityRule {
            category: Category::PesquisaEstatistica,
            headline_weight: 3,
            threshold: 3,
            requires_any: strings(&["pesquisa"]),
            requires_subject: true,
            exclusive: true,
        },
        PriorityRule {
            category: Category::SaudeTratamento,
            headline_weight: 5,
            threshold: 5,
            requires_any: strings(&[
                "medicamento",
                "medicação",
                "remédio",
                "terapia",
                "tratamento",
            ]),
            requires_subject: false,
            exclusive: false,
        },
        PriorityRule {
            category: Category::FamiliaCuidadores,
            headline_weight: 5,
            threshold: 5,
            requires_any: strings(&["família", "pais", "mães", "cuidadores", "desafio"]),
            requires_subject: false,
            exclusive: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_has_all_priority_categories() {
        let lexicon = Lexicon::default();
        let priority: Vec<Category> = lexicon.priority_rules.iter().map(|r| r.category).collect();
        assert_eq!(priority[0], Category::ViolenciaDiscriminacao);
        assert!(priority.contains(&Category::DireitosLegislacao));
        assert!(priority.contains(&Category::PesquisaEstatistica));
        // Every priority category has a keyword table
        for rule in &lexicon.priority_rules {
            assert!(!lexicon.terms_for(rule.category).is_empty());
        }
    }

    #[test]
    fn test_terms_are_lowercase() {
        let lexicon = Lexicon::default();
        for entry in &lexicon.categories {
            for term in &entry.terms {
                assert_eq!(term, &term.to_lowercase(), "term not lowercase: {}", term);
            }
        }
        for term in lexicon.required_terms.iter().chain(&lexicon.irrelevant_terms) {
            assert_eq!(term, &term.to_lowercase());
        }
    }

    #[test]
    fn test_phrase_groups_win_on_single_match() {
        let lexicon = Lexicon::default();
        for group in &lexicon.phrase_groups {
            assert!(group.phrase_score >= group.threshold);
        }
    }

    #[test]
    fn test_lexicon_serde_round_trip() {
        let lexicon = Lexicon::default();
        let json = serde_json::to_string(&lexicon).unwrap();
        let back: Lexicon = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, lexicon.version);
        assert_eq!(back.categories.len(), lexicon.categories.len());
        assert_eq!(back.priority_rules.len(), lexicon.priority_rules.len());
    }

    #[test]
    fn test_terms_for_unknown_category_is_empty() {
        let lexicon = Lexicon::default();
        assert!(lexicon.terms_for(Category::Outros).is_empty());
    }
}
