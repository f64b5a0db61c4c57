//! Mistok-core - BPE merge scheduling and vocabulary data model
//!
//! This crate provides the algorithmic core for reproducing a pretrained
//! BPE tokenizer's output bit-for-bit: the vocabulary and merge tables and
//! the priority-ordered merge scheduler that applies them.
//!
//! # Features
//!
//! - Immutable vocabulary with forward and reverse lookups (`AHashMap` and
//!   compact strings)
//! - Merge-rank lookups keyed by token-id pairs
//! - A merge scheduler with exact left-to-right tie-breaking for
//!   equal-priority merges
//! - Error handling with detailed diagnostics
//!
//! # Example
//!
//! ```rust
//! use compact_str::CompactString;
//! use mistok_core::{MergeScheduler, MergeTable, VocabTable};
//!
//! let vocab = VocabTable::from_entries(
//!     ["<unk>", "<s>", "\u{2581}", "a", "b", "ab"]
//!         .into_iter()
//!         .map(CompactString::new)
//!         .collect(),
//! )?;
//! let merges = MergeTable::from_pairs([(3, 4)]);
//!
//! let out = MergeScheduler::new(&vocab, &merges).merge(&[3, 4]);
//! assert_eq!(out, vec![5]);
//! # Ok::<(), mistok_core::TokenizerError>(())
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core BPE algorithm modules
pub mod core;
pub use core::{
    CandidateQueue, MergeCandidate, MergeScheduler, MergeTable, Pair, SpecialTokens, VocabTable,
    BOS_ID, SPIECE_UNDERLINE, UNK_ID,
};
