//! # topic-lexicon
//!
//! Static, versioned lexicon tables for the classifier and the fact
//! extractor, plus the term-matching rule they share. The classifier
//! and extractor are thin interpreters over these tables, so the
//! scoring contract can be unit-tested in isolation from any text
//! corpus.
//!
//! The compiled-in defaults carry the Brazilian-Portuguese autism news
//! lexicon. Tables are serde-loadable so a deployment can override
//! them as configuration without touching code.

pub mod facts;
pub mod matching;
pub mod tables;

pub use facts::FactPatternTable;
pub use matching::contains_term;
pub use tables::{CategoryTerms, Lexicon, PhraseGroup, PriorityRule};
