//! Rule-based fact extraction from article text.
//!
//! Splits article text into sentences, scores each against the pattern
//! tables in [`topic_lexicon::FactPatternTable`], tags the survivors
//! with a [`FactType`](topic_types::FactType), pulls structured data
//! (percentages, years, laws, institutions) out of them, and
//! aggregates a deduplicated, score-ranked fact list per topic.

mod config;
mod error;
mod extractor;
mod sentences;

pub use config::FactsConfig;
pub use error::FactsError;
pub use extractor::FactExtractor;
pub use sentences::split_sentences;
