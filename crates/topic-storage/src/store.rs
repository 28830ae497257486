//! RocksDB wrapper for the clustering engine.

use std::path::Path;

use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use tracing::{debug, info, instrument};

use topic_types::{Article, Category, ClusteringRun, RunStatus, Topic};

use crate::column_families::{build_cf_descriptors, CF_ARTICLES, CF_RUNS, CF_TOPICS};
use crate::error::StoreError;

/// Key format for articles: article:{article_id}
pub fn article_key(article_id: &str) -> String {
    format!("article:{}", article_id)
}

/// Key format for topics: topic:{topic_id}
pub fn topic_key(topic_id: &str) -> String {
    format!("topic:{}", topic_id)
}

/// Key format for runs: run:{region}:{run_id}
///
/// The run id is a ULID, so keys under one region prefix sort
/// chronologically.
pub fn run_key(region: &str, run_id: &str) -> String {
    format!("run:{}:{}", region, run_id)
}

/// Main storage interface for the clustering engine.
pub struct Store {
    db: DB,
}

impl Store {
    /// Open storage at the given path, creating if necessary.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("Opening store at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_background_jobs(4);

        let cf_descriptors = build_cf_descriptors();
        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        Ok(Self { db })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::ColumnFamilyNotFound(name.to_string()))
    }

    /// Scan all values under a key prefix in a column family.
    fn prefix_scan(&self, cf_name: &str, prefix: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        let iter = self.db.iterator_cf(
            &cf,
            IteratorMode::From(prefix.as_bytes(), Direction::Forward),
        );
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            values.push(value.to_vec());
        }
        Ok(values)
    }

    // --- Articles ---

    /// Save an article document.
    ///
    /// Used by the external collector's write contract and by the
    /// engine when persisting classification results.
    #[instrument(skip(self, article), fields(article_id = %article.id))]
    pub fn put_article(&self, article: &Article) -> Result<(), StoreError> {
        let cf = self.cf(CF_ARTICLES)?;
        let value = serde_json::to_vec(article)?;
        self.db.put_cf(&cf, article_key(&article.id), value)?;
        debug!("Saved article");
        Ok(())
    }

    /// Get an article by id.
    pub fn get_article(&self, article_id: &str) -> Result<Option<Article>, StoreError> {
        let cf = self.cf(CF_ARTICLES)?;
        match self.db.get_cf(&cf, article_key(article_id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List unclustered articles for a region, newest first.
    ///
    /// Articles already classified `Irrelevante` are excluded — they
    /// were seen by a previous run and stay out of the pipeline.
    pub fn list_unclustered(&self, region: &str, limit: usize) -> Result<Vec<Article>, StoreError> {
        let mut articles: Vec<Article> = Vec::new();
        for value in self.prefix_scan(CF_ARTICLES, "article:")? {
            let article: Article = serde_json::from_slice(&value)?;
            if article.region != region || article.clustered {
                continue;
            }
            if article.category == Some(Category::Irrelevante) {
                continue;
            }
            articles.push(article);
        }

        // Newest first; articles without a date sort last
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit);
        Ok(articles)
    }

    /// List the member articles of a topic, skipping ids that no
    /// longer resolve.
    pub fn get_topic_articles(&self, topic: &Topic) -> Result<Vec<Article>, StoreError> {
        let mut articles = Vec::with_capacity(topic.article_ids.len());
        for id in &topic.article_ids {
            if let Some(article) = self.get_article(id)? {
                articles.push(article);
            }
        }
        Ok(articles)
    }

    // --- Topics ---

    /// Save a topic document.
    #[instrument(skip(self, topic), fields(topic_id = %topic.id))]
    pub fn put_topic(&self, topic: &Topic) -> Result<(), StoreError> {
        let cf = self.cf(CF_TOPICS)?;
        let value = serde_json::to_vec(topic)?;
        self.db.put_cf(&cf, topic_key(&topic.id), value)?;
        debug!("Saved topic");
        Ok(())
    }

    /// Get a topic by id (tombstones included; callers filtering for
    /// presentation should use `list_active_topics`).
    pub fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>, StoreError> {
        let cf = self.cf(CF_TOPICS)?;
        match self.db.get_cf(&cf, topic_key(topic_id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List active topics for a region. Merge tombstones are never
    /// returned.
    pub fn list_active_topics(&self, region: &str) -> Result<Vec<Topic>, StoreError> {
        let mut topics = Vec::new();
        for value in self.prefix_scan(CF_TOPICS, "topic:")? {
            let topic: Topic = serde_json::from_slice(&value)?;
            if topic.is_active && topic.region == region {
                topics.push(topic);
            }
        }
        // ULID ids sort by creation time
        topics.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(topics)
    }

    /// Atomically persist a topic together with its membership marks.
    ///
    /// Every member article is flipped to `clustered = true` with
    /// `topic_id` pointing at the topic, in the same WriteBatch as the
    /// topic document itself. An article already claimed by a
    /// different topic aborts the whole commit with
    /// `StoreError::Conflict`, leaving nothing applied.
    #[instrument(skip(self, topic), fields(topic_id = %topic.id, members = topic.article_ids.len()))]
    pub fn commit_topic(&self, topic: &Topic) -> Result<(), StoreError> {
        let topics_cf = self.cf(CF_TOPICS)?;
        let articles_cf = self.cf(CF_ARTICLES)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&topics_cf, topic_key(&topic.id), serde_json::to_vec(topic)?);

        for article_id in &topic.article_ids {
            let mut article = self
                .get_article(article_id)?
                .ok_or_else(|| StoreError::NotFound(format!("article {}", article_id)))?;

            match &article.topic_id {
                Some(existing) if existing != &topic.id => {
                    return Err(StoreError::Conflict {
                        article_id: article_id.clone(),
                        topic_id: existing.clone(),
                    });
                }
                _ => {}
            }

            article.clustered = true;
            article.topic_id = Some(topic.id.clone());
            batch.put_cf(
                &articles_cf,
                article_key(article_id),
                serde_json::to_vec(&article)?,
            );
        }

        self.db.write(batch)?;
        debug!("Committed topic with members");
        Ok(())
    }

    /// Atomically apply a topic merge.
    ///
    /// Writes the updated primary, tombstones the absorbed topic, and
    /// repoints every article of the absorbed topic at the primary —
    /// one WriteBatch, so a crash can never leave the pair half-merged.
    #[instrument(skip(self, primary), fields(primary_id = %primary.id, absorbed_id = absorbed_id))]
    pub fn commit_merge(&self, primary: &Topic, absorbed_id: &str) -> Result<(), StoreError> {
        let topics_cf = self.cf(CF_TOPICS)?;
        let articles_cf = self.cf(CF_ARTICLES)?;

        let mut absorbed = self
            .get_topic(absorbed_id)?
            .ok_or_else(|| StoreError::NotFound(format!("topic {}", absorbed_id)))?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &topics_cf,
            topic_key(&primary.id),
            serde_json::to_vec(primary)?,
        );

        for article_id in &absorbed.article_ids {
            if let Some(mut article) = self.get_article(article_id)? {
                article.clustered = true;
                article.topic_id = Some(primary.id.clone());
                batch.put_cf(
                    &articles_cf,
                    article_key(article_id),
                    serde_json::to_vec(&article)?,
                );
            }
        }

        absorbed.is_active = false;
        batch.put_cf(
            &topics_cf,
            topic_key(absorbed_id),
            serde_json::to_vec(&absorbed)?,
        );

        self.db.write(batch)?;
        debug!("Committed merge");
        Ok(())
    }

    // --- Runs ---

    /// Save a clustering run audit record.
    #[instrument(skip(self, run), fields(run_id = %run.id, region = %run.region))]
    pub fn put_run(&self, run: &ClusteringRun) -> Result<(), StoreError> {
        let cf = self.cf(CF_RUNS)?;
        let value = serde_json::to_vec(run)?;
        self.db.put_cf(&cf, run_key(&run.region, &run.id), value)?;
        Ok(())
    }

    /// Most recent completed run for a region, if any.
    pub fn latest_completed_run(&self, region: &str) -> Result<Option<ClusteringRun>, StoreError> {
        let prefix = format!("run:{}:", region);
        let mut latest: Option<ClusteringRun> = None;
        for value in self.prefix_scan(CF_RUNS, &prefix)? {
            let run: ClusteringRun = serde_json::from_slice(&value)?;
            if run.status == RunStatus::Completed {
                // Scan is in key order, so the last completed wins
                latest = Some(run);
            }
        }
        Ok(latest)
    }

    /// All run records for a region, oldest first.
    pub fn list_runs(&self, region: &str) -> Result<Vec<ClusteringRun>, StoreError> {
        let prefix = format!("run:{}:", region);
        let mut runs = Vec::new();
        for value in self.prefix_scan(CF_RUNS, &prefix)? {
            runs.push(serde_json::from_slice(&value)?);
        }
        Ok(runs)
    }
}
