use thiserror::Error;

use topic_facts::FactsError;
use topic_storage::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("fact extraction error: {0}")]
    Facts(#[from] FactsError),
}
