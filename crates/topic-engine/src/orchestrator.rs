//! The batch driver: classify, cluster, build, merge, extract facts.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};
use ulid::Ulid;

use topic_classify::Classifier;
use topic_cluster::{dbscan, ClusterParams};
use topic_facts::FactExtractor;
use topic_lexicon::{FactPatternTable, Lexicon};
use topic_storage::{Store, StoreError};
use topic_types::{Article, Category, ClusteringRun, FactSummary, RunSummary, Topic};

use crate::builder::TopicBuilder;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::merger::TopicMerger;

/// The clustering engine entry point.
///
/// Owns the classifier, the fact extractor and the configuration;
/// storage is shared. One engine drives any number of runs.
pub struct ClusteringEngine {
    store: Arc<Store>,
    classifier: Classifier,
    extractor: FactExtractor,
    config: EngineConfig,
}

impl ClusteringEngine {
    pub fn new(store: Arc<Store>, config: EngineConfig) -> Result<Self, EngineError> {
        let extractor = FactExtractor::new(FactPatternTable::default(), config.facts.clone())?;
        Ok(Self {
            store,
            classifier: Classifier::new(Lexicon::default()),
            extractor,
            config,
        })
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Run the full pipeline for a region.
    ///
    /// Stage order is fixed: classify, cluster, build, merge, facts.
    /// A completed run within the configured interval skips the run
    /// unless `force` is set. Every run leaves an audit record.
    #[instrument(skip(self), fields(region = region))]
    pub async fn run_clustering(
        &self,
        region: &str,
        force: bool,
    ) -> Result<RunSummary, EngineError> {
        if !force && self.recently_ran(region)? {
            info!("recent completed run found, skipping");
            return Ok(RunSummary {
                skipped: true,
                ..RunSummary::default()
            });
        }

        let mut run = ClusteringRun::start(Ulid::new().to_string(), region);
        self.store.put_run(&run)?;

        match self.execute_run(region) {
            Ok(summary) => {
                run.complete(&summary);
                self.store.put_run(&run)?;
                info!(
                    topics_created = summary.topics_created,
                    articles_processed = summary.articles_processed,
                    "clustering run completed"
                );
                Ok(summary)
            }
            Err(err) => {
                run.fail(err.to_string());
                self.store.put_run(&run)?;
                Err(err)
            }
        }
    }

    /// Recompute the fact cache for one topic. Also what the fact
    /// stage of a run invokes per topic.
    #[instrument(skip(self))]
    pub async fn extract_topic_facts(&self, topic_id: &str) -> Result<(), EngineError> {
        let topic = self
            .store
            .get_topic(topic_id)?
            .ok_or_else(|| StoreError::NotFound(format!("topic {}", topic_id)))?;
        self.refresh_topic_facts(topic)
    }

    fn recently_ran(&self, region: &str) -> Result<bool, EngineError> {
        let Some(last) = self.store.latest_completed_run(region)? else {
            return Ok(false);
        };
        let Some(finished_at) = last.finished_at else {
            return Ok(false);
        };
        let min_interval = Duration::minutes(self.config.run.min_interval_minutes);
        Ok(Utc::now() - finished_at < min_interval)
    }

    fn execute_run(&self, region: &str) -> Result<RunSummary, EngineError> {
        let mut articles = self
            .store
            .list_unclustered(region, self.config.run.max_articles)?;
        info!(articles = articles.len(), "snapshotted unclustered articles");

        // Classify and persist; irrelevant articles drop out here but
        // still count toward the audit record.
        for article in articles.iter_mut() {
            let category = self.classifier.classify_article(article);
            article.category = Some(category);
            self.store.put_article(article)?;
        }
        let total_articles = articles.len();
        articles.retain(|a| a.category != Some(Category::Irrelevante));

        let builder = TopicBuilder::new(
            &self.store,
            self.classifier.lexicon(),
            self.config.merge.similarity_threshold,
        );

        let mut topics_created = 0;
        let mut categories_processed = 0;
        for &category in Category::all() {
            let batch: Vec<&Article> = articles
                .iter()
                .filter(|a| a.category == Some(category))
                .collect();
            if batch.is_empty() {
                continue;
            }
            categories_processed += 1;
            topics_created += self.cluster_category(&builder, category, region, &batch);
        }

        let merger = TopicMerger::new(&self.store, self.config.merge.clone());
        merger.merge_region(region)?;

        self.fact_pass(region);

        Ok(RunSummary {
            topics_created,
            articles_processed: total_articles,
            categories_processed,
            skipped: false,
        })
    }

    /// Cluster one category's batch and build its topics. Failures are
    /// contained per cluster; the batch keeps going.
    fn cluster_category(
        &self,
        builder: &TopicBuilder<'_>,
        category: Category,
        region: &str,
        batch: &[&Article],
    ) -> usize {
        let (embedded, unembedded): (Vec<&Article>, Vec<&Article>) = batch
            .iter()
            .copied()
            .partition(|a| a.embedding.as_ref().map_or(false, |e| !e.is_empty()));

        let embeddings: Vec<Vec<f32>> = embedded
            .iter()
            .filter_map(|a| a.embedding.clone())
            .collect();
        let params = ClusterParams::for_batch(embeddings.len(), &self.config.cluster);
        let assignment = dbscan(&embeddings, params.eps, params.min_samples);
        debug!(
            category = category.id(),
            clusters = assignment.clusters.len(),
            noise = assignment.noise.len(),
            unembedded = unembedded.len(),
            "category batch clustered"
        );

        let mut created = 0;
        for cluster in &assignment.clusters {
            let members: Vec<Article> = cluster.iter().map(|&i| (*embedded[i]).clone()).collect();
            match builder.build_topic(category, region, &members) {
                Ok(built) if built.created => created += 1,
                Ok(_) => {}
                Err(err) => {
                    warn!(category = category.id(), error = %err, "cluster build failed");
                }
            }
        }

        // Noise points and articles without embeddings become
        // single-member topics; nothing is dropped.
        let singles = assignment
            .noise
            .iter()
            .map(|&i| embedded[i])
            .chain(unembedded.iter().copied());
        for article in singles {
            match builder.build_singleton(article) {
                Ok(built) if built.created => created += 1,
                Ok(_) => {}
                Err(err) => {
                    warn!(article_id = %article.id, error = %err, "singleton build failed");
                }
            }
        }

        created
    }

    /// Refresh stale fact caches for a region, isolating per-topic
    /// failures: a failed topic keeps `facts_processed = false` and is
    /// retried next run.
    fn fact_pass(&self, region: &str) {
        let topics = match self.store.list_active_topics(region) {
            Ok(topics) => topics,
            Err(err) => {
                warn!(error = %err, "fact pass could not list topics");
                return;
            }
        };
        for topic in topics {
            if topic.facts_processed {
                continue;
            }
            let topic_id = topic.id.clone();
            if let Err(err) = self.refresh_topic_facts(topic) {
                warn!(topic_id = %topic_id, error = %err, "fact extraction failed");
            }
        }
    }

    fn refresh_topic_facts(&self, mut topic: Topic) -> Result<(), EngineError> {
        let articles = self.store.get_topic_articles(&topic)?;
        let mut facts = Vec::new();
        for article in &articles {
            facts.extend(self.extractor.extract_from_article(article));
        }
        let aggregated = self.extractor.aggregate(facts);

        topic.fact_summary = Some(FactSummary::from_facts(&aggregated));
        let cached = self.extractor.config().cached_facts;
        topic.facts = aggregated.into_iter().take(cached).collect();
        topic.facts_processed = true;
        topic.facts_processed_at = Some(Utc::now());
        self.store.put_topic(&topic)?;

        debug!(topic_id = %topic.id, facts = topic.facts.len(), "fact cache refreshed");
        Ok(())
    }
}
