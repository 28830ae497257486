//! # topic-types
//!
//! Shared data model for the topic clustering engine.
//!
//! Articles arrive from an external collector carrying raw text and a
//! pre-computed embedding vector. The engine classifies them into
//! categories, groups them into Topics via density clustering, and
//! attaches ranked Facts to each Topic. The types in this crate are
//! the documents persisted by `topic-storage` and the values exchanged
//! between the engine crates.

pub mod article;
pub mod category;
pub mod fact;
pub mod run;
pub mod topic;

pub use article::Article;
pub use category::Category;
pub use fact::{Fact, FactData, FactSummary, FactType};
pub use run::{ClusteringRun, RunStatus, RunSummary};
pub use topic::{Topic, TopicId};

/// An embedding vector produced by the external embedding model.
pub type Embedding = Vec<f32>;
