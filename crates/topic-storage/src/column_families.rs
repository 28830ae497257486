//! Column family definitions for RocksDB.
//!
//! Each column family isolates documents with different access patterns:
//! - articles: collector-written documents, updated in place by the engine
//! - topics: engine-written topic documents
//! - runs: append-only clustering run audit records

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family for article documents
pub const CF_ARTICLES: &str = "articles";

/// Column family for topic documents
pub const CF_TOPICS: &str = "topics";

/// Column family for clustering run audit records
pub const CF_RUNS: &str = "runs";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_ARTICLES, CF_TOPICS, CF_RUNS];

/// Options for the append-only runs column family (compressed).
fn runs_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Build all column family descriptors.
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_ARTICLES, Options::default()),
        ColumnFamilyDescriptor::new(CF_TOPICS, Options::default()),
        ColumnFamilyDescriptor::new(CF_RUNS, runs_options()),
    ]
}
