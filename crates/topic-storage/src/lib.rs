//! Storage layer for the topic clustering engine.
//!
//! Provides RocksDB-backed storage with:
//! - Column family isolation per document type (articles, topics, runs)
//! - Prefix-scannable string keys
//! - Atomic writes via WriteBatch for the create-topic + mark-members
//!   and merge commits, so a failed run never leaves half-applied
//!   cross-entity state

pub mod column_families;
pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::Store;
