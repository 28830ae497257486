//! Clustering run audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a clustering run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Started,
    Completed,
    Error,
}

/// Append-only audit record for one clustering run.
///
/// Created with status `Started` at run begin and finalized exactly
/// once at run end; never mutated after completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringRun {
    /// ULID; encodes the start time, so runs sort chronologically
    pub id: String,
    pub region: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub topics_created: usize,
    pub articles_processed: usize,
    pub categories_processed: usize,
    pub error: Option<String>,
}

impl ClusteringRun {
    /// Open a new run record.
    pub fn start(id: String, region: impl Into<String>) -> Self {
        Self {
            id,
            region: region.into(),
            status: RunStatus::Started,
            started_at: Utc::now(),
            finished_at: None,
            topics_created: 0,
            articles_processed: 0,
            categories_processed: 0,
            error: None,
        }
    }

    /// Finalize as completed with the run's counters.
    pub fn complete(&mut self, summary: &RunSummary) {
        self.status = RunStatus::Completed;
        self.finished_at = Some(Utc::now());
        self.topics_created = summary.topics_created;
        self.articles_processed = summary.articles_processed;
        self.categories_processed = summary.categories_processed;
    }

    /// Finalize as failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = RunStatus::Error;
        self.finished_at = Some(Utc::now());
        self.error = Some(message.into());
    }
}

/// Counters returned by `run_clustering`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub topics_created: usize,
    pub articles_processed: usize,
    pub categories_processed: usize,
    /// True when the recency guard skipped the run entirely
    #[serde(default)]
    pub skipped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_lifecycle_complete() {
        let mut run = ClusteringRun::start("01H0000000000000000000TEST".to_string(), "BR");
        assert_eq!(run.status, RunStatus::Started);
        assert!(run.finished_at.is_none());

        let summary = RunSummary {
            topics_created: 3,
            articles_processed: 12,
            categories_processed: 2,
            skipped: false,
        };
        run.complete(&summary);
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.topics_created, 3);
        assert_eq!(run.articles_processed, 12);
        assert!(run.finished_at.is_some());
        assert!(run.error.is_none());
    }

    #[test]
    fn test_run_lifecycle_error() {
        let mut run = ClusteringRun::start("01H0000000000000000000TEST".to_string(), "BR");
        run.fail("storage unavailable");
        assert_eq!(run.status, RunStatus::Error);
        assert_eq!(run.error.as_deref(), Some("storage unavailable"));
        assert!(run.finished_at.is_some());
    }
}
