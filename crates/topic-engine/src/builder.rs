//! Topic creation from clusters and singletons.

use std::collections::HashSet;

use tracing::{debug, info, instrument};
use ulid::Ulid;

use topic_cluster::similarity::{centroid, cosine_similarity};
use topic_lexicon::Lexicon;
use topic_storage::Store;
use topic_types::{Article, Category, Topic, TopicId};

use crate::error::EngineError;

/// Fallback when no member has a usable title.
const UNTITLED: &str = "Sem título";

/// Most title words kept in a generated topic title.
const MAX_TITLE_WORDS: usize = 5;

/// Outcome of building a topic for one cluster.
#[derive(Debug, Clone)]
pub struct BuiltTopic {
    pub id: TopicId,
    /// False when the cluster extended an existing topic instead
    pub created: bool,
}

/// Builds topics from article clusters.
pub struct TopicBuilder<'a> {
    store: &'a Store,
    title_stop_words: HashSet<String>,
    /// Centroid similarity at or above which a cluster extends an
    /// existing topic instead of creating a near-duplicate
    attach_threshold: f32,
}

impl<'a> TopicBuilder<'a> {
    pub fn new(store: &'a Store, lexicon: &Lexicon, attach_threshold: f32) -> Self {
        Self {
            store,
            title_stop_words: lexicon.title_stop_words.iter().cloned().collect(),
            attach_threshold,
        }
    }

    /// Build (or extend) a topic for a cluster of articles.
    ///
    /// The cluster's centroid is compared against recent active topics
    /// of the same category and region first; a close match absorbs
    /// the cluster. Otherwise a fresh topic is committed atomically
    /// together with its membership marks.
    #[instrument(skip(self, members), fields(category = category.id(), members = members.len()))]
    pub fn build_topic(
        &self,
        category: Category,
        region: &str,
        members: &[Article],
    ) -> Result<BuiltTopic, EngineError> {
        let embeddings: Vec<&[f32]> = members
            .iter()
            .filter_map(|a| a.embedding.as_deref())
            .filter(|e| !e.is_empty())
            .collect();
        let cluster_centroid = centroid(&embeddings);

        if let Some(existing) = self.find_similar_topic(category, region, &cluster_centroid)? {
            return self.extend_topic(existing, members);
        }

        let mut topic = Topic::new(
            Ulid::new().to_string(),
            self.generate_title(members),
            category,
            region,
        );
        topic.description = format!("Tópico com {} artigos relacionados", members.len());
        topic.add_members(members.iter().map(|a| a.id.clone()));
        topic.add_sources(members.iter().map(|a| a.source_name.clone()));
        topic.centroid = cluster_centroid;

        self.store.commit_topic(&topic)?;
        info!(topic_id = %topic.id, title = %topic.title, "created topic");
        Ok(BuiltTopic {
            id: topic.id,
            created: true,
        })
    }

    /// Place a noise point or an article without an embedding: attach
    /// to a close existing topic when there is one, otherwise create a
    /// single-member topic titled by the article itself.
    #[instrument(skip(self, article), fields(article_id = %article.id))]
    pub fn build_singleton(&self, article: &Article) -> Result<BuiltTopic, EngineError> {
        let category = article.category.unwrap_or(Category::Outros);

        if let Some(embedding) = article.embedding.as_deref() {
            if let Some(existing) = self.find_similar_topic(category, &article.region, embedding)? {
                return self.extend_topic(existing, std::slice::from_ref(article));
            }
        }

        let title = if article.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            article.title.clone()
        };

        let mut topic = Topic::new(Ulid::new().to_string(), title, category, &article.region);
        topic.description = "Tópico com 1 artigo relacionado".to_string();
        topic.add_members([article.id.clone()]);
        topic.add_sources([article.source_name.clone()]);
        if let Some(embedding) = &article.embedding {
            topic.centroid = embedding.clone();
        }

        self.store.commit_topic(&topic)?;
        debug!(topic_id = %topic.id, "created singleton topic");
        Ok(BuiltTopic {
            id: topic.id,
            created: true,
        })
    }

    /// Closest active same-category topic above the attach threshold.
    fn find_similar_topic(
        &self,
        category: Category,
        region: &str,
        cluster_centroid: &[f32],
    ) -> Result<Option<Topic>, EngineError> {
        if cluster_centroid.is_empty() {
            return Ok(None);
        }

        let mut best: Option<(Topic, f32)> = None;
        for topic in self.store.list_active_topics(region)? {
            if topic.category != category || topic.centroid.is_empty() {
                continue;
            }
            let similarity = cosine_similarity(&topic.centroid, cluster_centroid);
            if similarity >= self.attach_threshold
                && best.as_ref().map_or(true, |(_, s)| similarity > *s)
            {
                best = Some((topic, similarity));
            }
        }
        Ok(best.map(|(topic, _)| topic))
    }

    fn extend_topic(
        &self,
        mut topic: Topic,
        members: &[Article],
    ) -> Result<BuiltTopic, EngineError> {
        topic.add_members(members.iter().map(|a| a.id.clone()));
        topic.add_sources(members.iter().map(|a| a.source_name.clone()));
        topic.description = format!("Tópico com {} artigos relacionados", topic.article_count);

        // Recompute the centroid over the full membership.
        let articles = self.store.get_topic_articles(&topic)?;
        let mut embeddings: Vec<&[f32]> = articles
            .iter()
            .filter_map(|a| a.embedding.as_deref())
            .filter(|e| !e.is_empty())
            .collect();
        // Cluster members are not yet persisted as topic members.
        for article in members {
            if articles.iter().any(|a| a.id == article.id) {
                continue;
            }
            if let Some(embedding) = article.embedding.as_deref() {
                if !embedding.is_empty() {
                    embeddings.push(embedding);
                }
            }
        }
        topic.centroid = centroid(&embeddings);

        self.store.commit_topic(&topic)?;
        info!(topic_id = %topic.id, members = topic.article_count, "extended existing topic");
        Ok(BuiltTopic {
            id: topic.id,
            created: false,
        })
    }

    /// Title from the most frequent significant words shared by at
    /// least two member titles; falls back to the first member's title.
    fn generate_title(&self, members: &[Article]) -> String {
        let mut order: Vec<String> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();

        for article in members {
            let mut seen = HashSet::new();
            for word in self.significant_words(&article.title) {
                if !seen.insert(word.clone()) {
                    continue;
                }
                match order.iter().position(|w| w == &word) {
                    Some(idx) => counts[idx] += 1,
                    None => {
                        order.push(word);
                        counts.push(1);
                    }
                }
            }
        }

        let mut shared: Vec<(usize, &String)> = order
            .iter()
            .enumerate()
            .filter(|(idx, _)| counts[*idx] >= 2)
            .map(|(idx, word)| (counts[idx], word))
            .collect();
        // Stable sort keeps first-appearance order among ties.
        shared.sort_by(|a, b| b.0.cmp(&a.0));

        if !shared.is_empty() {
            return shared
                .into_iter()
                .take(MAX_TITLE_WORDS)
                .map(|(_, word)| capitalize(word))
                .collect::<Vec<_>>()
                .join(" ");
        }

        members
            .iter()
            .map(|a| a.title.trim())
            .find(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_string()
    }

    fn significant_words(&self, title: &str) -> Vec<String> {
        title
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 3 && !self.title_stop_words.contains(*w))
            .map(str::to_string)
            .collect()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn builder_env() -> (TempDir, Store, Lexicon) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store, Lexicon::default())
    }

    fn article(id: &str, title: &str, embedding: Option<Vec<f32>>) -> Article {
        let mut article = Article::new(id, title, "BR");
        article.category = Some(Category::EducacaoInclusiva);
        article.embedding = embedding;
        article.source_name = format!("Fonte {}", id);
        article
    }

    #[test]
    fn test_build_topic_commits_members() {
        let (_dir, store, lexicon) = builder_env();
        let builder = TopicBuilder::new(&store, &lexicon, 0.9);
        let members = vec![
            article("a1", "Escola amplia inclusão de alunos autistas", Some(vec![1.0, 0.0])),
            article("a2", "Inclusão de alunos autistas cresce na rede", Some(vec![0.99, 0.1])),
        ];
        for m in &members {
            store.put_article(m).unwrap();
        }

        let built = builder
            .build_topic(Category::EducacaoInclusiva, "BR", &members)
            .unwrap();
        assert!(built.created);

        let topic = store.get_topic(&built.id).unwrap().unwrap();
        assert_eq!(topic.article_count, 2);
        assert_eq!(topic.sources.len(), 2);
        assert!(!topic.centroid.is_empty());
        assert!(topic.membership_consistent());
        for id in ["a1", "a2"] {
            let a = store.get_article(id).unwrap().unwrap();
            assert_eq!(a.topic_id.as_deref(), Some(built.id.as_str()));
        }
    }

    #[test]
    fn test_title_from_shared_words() {
        let (_dir, store, lexicon) = builder_env();
        let builder = TopicBuilder::new(&store, &lexicon, 0.9);
        let members = vec![
            article("a1", "Escola amplia inclusão de alunos autistas", None),
            article("a2", "Alunos autistas ganham nova escola inclusiva", None),
        ];
        let title = builder.generate_title(&members);
        // "escola", "alunos" and "autistas" appear in both titles
        assert!(title.contains("Escola"));
        assert!(title.contains("Autistas"));
        assert!(title.split_whitespace().count() <= MAX_TITLE_WORDS);
    }

    #[test]
    fn test_title_falls_back_to_first_member() {
        let (_dir, store, lexicon) = builder_env();
        let builder = TopicBuilder::new(&store, &lexicon, 0.9);
        let members = vec![
            article("a1", "Título completamente singular", None),
            article("a2", "Outra manchete sem sobreposição", None),
        ];
        assert_eq!(builder.generate_title(&members), "Título completamente singular");
    }

    #[test]
    fn test_title_falls_back_to_untitled() {
        let (_dir, store, lexicon) = builder_env();
        let builder = TopicBuilder::new(&store, &lexicon, 0.9);
        let members = vec![article("a1", "  ", None)];
        assert_eq!(builder.generate_title(&members), UNTITLED);
    }

    #[test]
    fn test_singleton_uses_article_title() {
        let (_dir, store, lexicon) = builder_env();
        let builder = TopicBuilder::new(&store, &lexicon, 0.9);
        let single = article("a1", "Artigo isolado sobre inclusão", Some(vec![0.0, 1.0]));
        store.put_article(&single).unwrap();

        let built = builder.build_singleton(&single).unwrap();
        let topic = store.get_topic(&built.id).unwrap().unwrap();
        assert_eq!(topic.title, "Artigo isolado sobre inclusão");
        assert_eq!(topic.article_count, 1);
        assert_eq!(topic.centroid, vec![0.0, 1.0]);
    }

    #[test]
    fn test_singleton_without_embedding_has_empty_centroid() {
        let (_dir, store, lexicon) = builder_env();
        let builder = TopicBuilder::new(&store, &lexicon, 0.9);
        let single = article("a1", "Sem vetor", None);
        store.put_article(&single).unwrap();

        let built = builder.build_singleton(&single).unwrap();
        let topic = store.get_topic(&built.id).unwrap().unwrap();
        assert!(topic.centroid.is_empty());
    }

    #[test]
    fn test_similar_singleton_attaches_instead_of_duplicating() {
        let (_dir, store, lexicon) = builder_env();
        let builder = TopicBuilder::new(&store, &lexicon, 0.9);

        let members = vec![
            article("a1", "Escola amplia inclusão de alunos autistas", Some(vec![1.0, 0.0])),
            article("a2", "Inclusão de alunos autistas cresce", Some(vec![0.99, 0.1])),
        ];
        for m in &members {
            store.put_article(m).unwrap();
        }
        let original = builder
            .build_topic(Category::EducacaoInclusiva, "BR", &members)
            .unwrap();

        let late = article("a3", "Nova matéria sobre inclusão", Some(vec![0.995, 0.06]));
        store.put_article(&late).unwrap();
        let built = builder.build_singleton(&late).unwrap();

        // Joins the existing topic; no fresh topic for the merge pass
        // to tombstone later.
        assert!(!built.created);
        assert_eq!(built.id, original.id);
        let topics = store.list_active_topics("BR").unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].article_count, 3);
        let a3 = store.get_article("a3").unwrap().unwrap();
        assert_eq!(a3.topic_id, Some(original.id.clone()));
    }

    #[test]
    fn test_similar_cluster_extends_existing_topic() {
        let (_dir, store, lexicon) = builder_env();
        let builder = TopicBuilder::new(&store, &lexicon, 0.9);

        let first = vec![
            article("a1", "Escola amplia inclusão de alunos autistas", Some(vec![1.0, 0.0])),
            article("a2", "Inclusão de alunos autistas cresce", Some(vec![0.99, 0.1])),
        ];
        for m in &first {
            store.put_article(m).unwrap();
        }
        let original = builder
            .build_topic(Category::EducacaoInclusiva, "BR", &first)
            .unwrap();

        let second = vec![
            article("a3", "Mais escolas inclusivas para alunos autistas", Some(vec![0.995, 0.05])),
            article("a4", "Rede amplia vagas de inclusão escolar", Some(vec![1.0, 0.02])),
        ];
        for m in &second {
            store.put_article(m).unwrap();
        }
        let extended = builder
            .build_topic(Category::EducacaoInclusiva, "BR", &second)
            .unwrap();

        assert!(!extended.created);
        assert_eq!(extended.id, original.id);
        let topic = store.get_topic(&original.id).unwrap().unwrap();
        assert_eq!(topic.article_count, 4);
        assert_eq!(store.list_active_topics("BR").unwrap().len(), 1);
    }
}
