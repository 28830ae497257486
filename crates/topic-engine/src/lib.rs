//! The clustering engine: topic building, merging, and the batch
//! orchestrator that drives classification, clustering, merging and
//! fact extraction for a region, with an audit record per run.

mod builder;
mod config;
mod error;
mod merger;
mod orchestrator;

pub use builder::{BuiltTopic, TopicBuilder};
pub use config::{EngineConfig, MergeConfig, RunConfig};
pub use error::EngineError;
pub use merger::TopicMerger;
pub use orchestrator::ClusteringEngine;
