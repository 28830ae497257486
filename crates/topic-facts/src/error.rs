use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactsError {
    /// A pattern-table regex failed to compile
    #[error("invalid fact pattern: {0}")]
    Pattern(#[from] regex::Error),
}
