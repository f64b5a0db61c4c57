//! Mistok - Reference-exact BPE tokenizer
//!
//! This crate provides the user-facing API for converting text to and from
//! the fixed 32000-entry Mistral vocabulary, reproducing the reference
//! tokenizer's ids bit-for-bit, including its left-to-right tie-breaking and
//! byte-fallback rules.
//!
//! # Example
//!
//! ```no_run
//! use mistok::Tokenizer;
//!
//! # fn blobs() -> (String, String) { unimplemented!() }
//! let (vocab_blob, merges_blob) = blobs();
//! let tokenizer = Tokenizer::from_blobs(&vocab_blob, &merges_blob)?;
//!
//! let ids = tokenizer.encode("grabbed", true, true);
//! let text = tokenizer.decode(&ids, true, true)?;
//! assert_eq!(text, "grabbed");
//! # Ok::<(), mistok::TokenizerError>(())
//! ```

// Re-export core types
pub use mistok_core::{MergeTable, Result, TokenizerError, VocabTable};

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::Tokenizer;

// Blob loading
pub mod io;
pub use io::{load_merges, load_vocab};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
