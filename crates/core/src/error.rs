//! Error types for the tokenizer library.

use thiserror::Error;

/// Main error type for tokenizer operations.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// The vocabulary blob failed to decode or violates a structural invariant.
    #[error("Malformed vocabulary: {0}")]
    InvalidVocab(String),

    /// The merge-table blob failed to decode or references an unknown token id.
    #[error("Malformed merge table: {0}")]
    InvalidMerges(String),

    /// A token id outside the vocabulary was passed to decode.
    #[error("Token id {id} out of range for vocabulary of {vocab_size} entries")]
    InvalidTokenId { id: u32, vocab_size: usize },
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
