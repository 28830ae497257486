//! Density clustering over article embeddings.
//!
//! Provides the cosine-space vector math ([`similarity`]) and a
//! deterministic DBSCAN implementation ([`dbscan`]) used to partition a
//! category's articles into clusters and noise. Parameters scale with
//! batch size through [`ClusterParams::for_batch`].

mod config;
mod dbscan;
pub mod similarity;

pub use config::{ClusterConfig, ClusterParams};
pub use dbscan::{dbscan, ClusterAssignment};
