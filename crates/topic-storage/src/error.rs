//! Storage layer error types.

use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// RocksDB operation failed
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Column family not found
    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// An article is already claimed by a different active topic
    #[error("Article {article_id} already belongs to topic {topic_id}")]
    Conflict {
        article_id: String,
        topic_id: String,
    },
}
