//! Lexical article classification.
//!
//! Assigns each article to a [`Category`](topic_types::Category) using the
//! weighted term tables in [`topic_lexicon::Lexicon`]. Classification is a
//! pure function of the article text and the lexicon: no model calls, no
//! stored state, same input always yields the same category.

mod classifier;

pub use classifier::Classifier;
