//! Semantic categories for classified articles.

use serde::{Deserialize, Serialize};

/// Category assigned to an article by the classifier.
///
/// Declaration order is significant: it is the tie-break order used by
/// the classifier when two categories score equally, and the order in
/// which category groups are processed by the orchestrator.
///
/// `Outros` is in-domain but uncategorized; `Irrelevante` is
/// out-of-domain and excluded from clustering entirely.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Health and treatment coverage
    SaudeTratamento,
    /// Inclusive education
    EducacaoInclusiva,
    /// Rights and legislation
    DireitosLegislacao,
    /// Violence and discrimination
    ViolenciaDiscriminacao,
    /// Assistive technology
    TecnologiaAssistiva,
    /// Scientific research
    PesquisaCientifica,
    /// Families and caregivers
    FamiliaCuidadores,
    /// Labor market inclusion
    MercadoTrabalho,
    /// Culture and leisure
    CulturaLazer,
    /// Research and statistics
    PesquisaEstatistica,
    /// In-domain, no category matched
    Outros,
    /// Out of domain
    Irrelevante,
}

impl Category {
    /// Stable string id used in storage keys and external payloads.
    pub fn id(&self) -> &'static str {
        match self {
            Category::SaudeTratamento => "saude_tratamento",
            Category::EducacaoInclusiva => "educacao_inclusiva",
            Category::DireitosLegislacao => "direitos_legislacao",
            Category::ViolenciaDiscriminacao => "violencia_discriminacao",
            Category::TecnologiaAssistiva => "tecnologia_assistiva",
            Category::PesquisaCientifica => "pesquisa_cientifica",
            Category::FamiliaCuidadores => "familia_cuidadores",
            Category::MercadoTrabalho => "mercado_trabalho",
            Category::CulturaLazer => "cultura_lazer",
            Category::PesquisaEstatistica => "pesquisa_estatistica",
            Category::Outros => "outros",
            Category::Irrelevante => "irrelevante",
        }
    }

    /// Parse from the stable string id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::all()
            .iter()
            .chain(std::iter::once(&Category::Irrelevante))
            .find(|c| c.id() == id)
            .copied()
    }

    /// All topical categories, in tie-break order. Excludes `Irrelevante`.
    pub fn all() -> &'static [Category] {
        &[
            Category::SaudeTratamento,
            Category::EducacaoInclusiva,
            Category::DireitosLegislacao,
            Category::ViolenciaDiscriminacao,
            Category::TecnologiaAssistiva,
            Category::PesquisaCientifica,
            Category::FamiliaCuidadores,
            Category::MercadoTrabalho,
            Category::CulturaLazer,
            Category::PesquisaEstatistica,
            Category::Outros,
        ]
    }

    /// Whether an article with this category enters the clustering
    /// pipeline. Only `Irrelevante` is excluded.
    pub fn is_relevant(&self) -> bool {
        !matches!(self, Category::Irrelevante)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
