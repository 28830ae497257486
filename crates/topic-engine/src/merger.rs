//! Consolidation of near-duplicate topics.

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use topic_cluster::similarity::{centroid, cosine_similarity};
use topic_storage::Store;
use topic_types::Topic;

use crate::config::MergeConfig;
use crate::error::EngineError;

/// Merges overlapping active topics by centroid similarity.
pub struct TopicMerger<'a> {
    store: &'a Store,
    config: MergeConfig,
}

impl<'a> TopicMerger<'a> {
    pub fn new(store: &'a Store, config: MergeConfig) -> Self {
        Self { store, config }
    }

    /// Run merge passes for a region until no pair merges (bounded by
    /// `max_passes`). Returns the number of merges applied. Running
    /// again immediately is a no-op.
    #[instrument(skip(self))]
    pub fn merge_region(&self, region: &str) -> Result<usize, EngineError> {
        let mut total = 0;
        for pass in 0..self.config.max_passes {
            let merged = self.merge_pass(region)?;
            debug!(pass, merged, "merge pass finished");
            if merged == 0 {
                break;
            }
            total += merged;
        }
        if total > 0 {
            info!(total, "merged topics");
        }
        Ok(total)
    }

    /// One pairwise pass. Topics touched by a merge are skipped for
    /// the rest of the pass; the next pass sees their fresh state.
    fn merge_pass(&self, region: &str) -> Result<usize, EngineError> {
        let topics = self.store.list_active_topics(region)?;
        let mut touched: HashSet<String> = HashSet::new();
        let mut merged = 0;

        for i in 0..topics.len() {
            for j in (i + 1)..topics.len() {
                let (a, b) = (&topics[i], &topics[j]);
                if touched.contains(&a.id) || touched.contains(&b.id) {
                    continue;
                }
                if a.category != b.category
                    || a.centroid.is_empty()
                    || b.centroid.is_empty()
                {
                    continue;
                }

                let similarity = cosine_similarity(&a.centroid, &b.centroid);
                if similarity < self.config.similarity_threshold {
                    continue;
                }

                match self.merge_pair(a, b) {
                    Ok(()) => {
                        touched.insert(a.id.clone());
                        touched.insert(b.id.clone());
                        merged += 1;
                    }
                    Err(err) => {
                        // Leave the pair for a later pass.
                        warn!(
                            primary = %a.id,
                            other = %b.id,
                            error = %err,
                            "topic merge failed"
                        );
                    }
                }
            }
        }

        Ok(merged)
    }

    /// Absorb the later topic into the earlier one, atomically.
    fn merge_pair(&self, a: &Topic, b: &Topic) -> Result<(), EngineError> {
        let (primary, absorbed) = if (a.created_at, &a.id) <= (b.created_at, &b.id) {
            (a, b)
        } else {
            (b, a)
        };

        let mut updated = primary.clone();
        updated.add_members(absorbed.article_ids.iter().cloned());
        updated.add_sources(absorbed.sources.iter().cloned());
        updated.description = format!("Tópico com {} artigos relacionados", updated.article_count);

        let articles = self.store.get_topic_articles(&updated)?;
        let embeddings: Vec<&[f32]> = articles
            .iter()
            .filter_map(|article| article.embedding.as_deref())
            .filter(|e| !e.is_empty())
            .collect();
        updated.centroid = centroid(&embeddings);

        self.store.commit_merge(&updated, &absorbed.id)?;
        info!(primary = %updated.id, absorbed = %absorbed.id, "merged topic pair");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use topic_types::{Article, Category};

    fn env() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn seed_topic(
        store: &Store,
        id: &str,
        category: Category,
        centroid_vec: Vec<f32>,
        member: &str,
    ) -> Topic {
        let mut article = Article::new(member, format!("Título {}", member), "BR");
        article.embedding = Some(centroid_vec.clone());
        article.category = Some(category);
        store.put_article(&article).unwrap();

        let mut topic = Topic::new(id.to_string(), format!("Tópico {}", id), category, "BR");
        topic.add_members([member.to_string()]);
        topic.centroid = centroid_vec;
        store.commit_topic(&topic).unwrap();
        topic
    }

    #[test]
    fn test_similar_topics_merge_to_one_active() {
        let (_dir, store) = env();
        // ids are lexically ordered, so t1 (equal created_at tie) wins
        seed_topic(&store, "t1", Category::SaudeTratamento, vec![1.0, 0.0], "a1");
        seed_topic(&store, "t2", Category::SaudeTratamento, vec![0.999, 0.045], "a2");

        let merger = TopicMerger::new(&store, MergeConfig::default());
        let merged = merger.merge_region("BR").unwrap();
        assert_eq!(merged, 1);

        let active = store.list_active_topics("BR").unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].article_count, 2);

        let repointed = store.get_article("a2").unwrap().unwrap();
        assert_eq!(repointed.topic_id, Some(active[0].id.clone()));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let (_dir, store) = env();
        seed_topic(&store, "t1", Category::SaudeTratamento, vec![1.0, 0.0], "a1");
        seed_topic(&store, "t2", Category::SaudeTratamento, vec![0.999, 0.045], "a2");

        let merger = TopicMerger::new(&store, MergeConfig::default());
        assert_eq!(merger.merge_region("BR").unwrap(), 1);
        assert_eq!(merger.merge_region("BR").unwrap(), 0);
        assert_eq!(store.list_active_topics("BR").unwrap().len(), 1);
    }

    #[test]
    fn test_different_categories_never_merge() {
        let (_dir, store) = env();
        seed_topic(&store, "t1", Category::SaudeTratamento, vec![1.0, 0.0], "a1");
        seed_topic(&store, "t2", Category::EducacaoInclusiva, vec![1.0, 0.0], "a2");

        let merger = TopicMerger::new(&store, MergeConfig::default());
        assert_eq!(merger.merge_region("BR").unwrap(), 0);
        assert_eq!(store.list_active_topics("BR").unwrap().len(), 2);
    }

    #[test]
    fn test_similarity_exactly_at_threshold_merges() {
        let (_dir, store) = env();
        // cosine([3,4], [4,3]) = 24/25 = 0.96 exactly, norms being 5.
        seed_topic(&store, "t1", Category::SaudeTratamento, vec![3.0, 4.0], "a1");
        seed_topic(&store, "t2", Category::SaudeTratamento, vec![4.0, 3.0], "a2");

        let config = MergeConfig {
            similarity_threshold: 0.96,
            ..MergeConfig::default()
        };
        let merger = TopicMerger::new(&store, config);
        assert_eq!(merger.merge_region("BR").unwrap(), 1);
        assert_eq!(store.list_active_topics("BR").unwrap().len(), 1);
    }

    #[test]
    fn test_dissimilar_topics_stay_apart() {
        let (_dir, store) = env();
        seed_topic(&store, "t1", Category::SaudeTratamento, vec![1.0, 0.0], "a1");
        seed_topic(&store, "t2", Category::SaudeTratamento, vec![0.0, 1.0], "a2");

        let merger = TopicMerger::new(&store, MergeConfig::default());
        assert_eq!(merger.merge_region("BR").unwrap(), 0);
    }

    #[test]
    fn test_empty_centroids_excluded() {
        let (_dir, store) = env();
        let mut bare = Topic::new("t1".to_string(), "Sem vetor", Category::Outros, "BR");
        bare.add_members(["a1".to_string()]);
        let mut article = Article::new("a1", "Título", "BR");
        article.category = Some(Category::Outros);
        store.put_article(&article).unwrap();
        store.commit_topic(&bare).unwrap();
        seed_topic(&store, "t2", Category::Outros, vec![1.0, 0.0], "a2");

        let merger = TopicMerger::new(&store, MergeConfig::default());
        assert_eq!(merger.merge_region("BR").unwrap(), 0);
    }

    #[test]
    fn test_chain_converges_to_fixpoint() {
        let (_dir, store) = env();
        // Three mutually similar topics collapse over successive passes.
        seed_topic(&store, "t1", Category::SaudeTratamento, vec![1.0, 0.0], "a1");
        seed_topic(&store, "t2", Category::SaudeTratamento, vec![0.999, 0.045], "a2");
        seed_topic(&store, "t3", Category::SaudeTratamento, vec![0.998, 0.06], "a3");

        let merger = TopicMerger::new(&store, MergeConfig::default());
        let merged = merger.merge_region("BR").unwrap();
        assert_eq!(merged, 2);
        assert_eq!(store.list_active_topics("BR").unwrap().len(), 1);
        assert_eq!(merger.merge_region("BR").unwrap(), 0);
    }
}
