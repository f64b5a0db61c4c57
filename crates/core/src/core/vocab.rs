//! Vocabulary storage and lookup.
//!
//! This module provides the fixed id <-> string mapping the tokenizer operates
//! over, using AHashMap for fast reverse lookups and CompactString for
//! memory-efficient token storage.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use compact_str::CompactString;

/// The unknown token occupies id 0 in the reference vocabulary.
pub const UNK_ID: u32 = 0;

/// The beginning-of-sequence token occupies id 1 in the reference vocabulary.
pub const BOS_ID: u32 = 1;

/// The SentencePiece word-boundary marker (LOWER ONE EIGHTH BLOCK).
///
/// Space characters are rewritten to this token string before merge
/// scheduling, and back to spaces during decoding.
pub const SPIECE_UNDERLINE: char = '\u{2581}';

/// Special token ids cached at construction for fast access.
#[derive(Debug, Clone, Copy)]
pub struct SpecialTokens {
    /// Unknown token id.
    pub unk: u32,
    /// Beginning-of-sequence token id.
    pub bos: u32,
    /// Single-space token id (28705 in the reference vocabulary).
    pub space: u32,
}

/// Immutable vocabulary with forward and reverse mappings.
///
/// Entry order defines token ids: entry `i` is the string for id `i`.
/// Built once from a decoded vocabulary blob and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct VocabTable {
    /// Forward mapping: id -> token string (index = id).
    tokens: Vec<CompactString>,
    /// Reverse mapping: token string -> id.
    ids: AHashMap<CompactString, u32>,
    /// Cached special token ids.
    pub special: SpecialTokens,
}

impl VocabTable {
    /// Build a vocabulary from its entries, in id order.
    ///
    /// Validates the structural invariants the rest of the tokenizer relies
    /// on: ids 0 and 1 exist (unknown and beginning-of-sequence), and the
    /// single-space token `▁` is present somewhere in the table.
    pub fn from_entries(tokens: Vec<CompactString>) -> Result<Self> {
        if tokens.len() <= BOS_ID as usize {
            return Err(TokenizerError::InvalidVocab(format!(
                "expected at least {} entries, got {}",
                BOS_ID + 1,
                tokens.len()
            )));
        }

        let mut ids = AHashMap::with_capacity(tokens.len());
        for (id, token) in tokens.iter().enumerate() {
            ids.insert(token.clone(), id as u32);
        }

        let space_key = SPIECE_UNDERLINE.to_string();
        let space = ids.get(space_key.as_str()).copied().ok_or_else(|| {
            TokenizerError::InvalidVocab("missing single-space token \u{2581}".to_string())
        })?;

        let special = SpecialTokens {
            unk: UNK_ID,
            bos: BOS_ID,
            space,
        };

        Ok(Self {
            tokens,
            ids,
            special,
        })
    }

    /// Get the token string for an id.
    ///
    /// Fails with [`TokenizerError::InvalidTokenId`] if the id is outside
    /// `[0, len)`. The returned string may be empty.
    #[inline]
    pub fn token(&self, id: u32) -> Result<&str> {
        self.tokens
            .get(id as usize)
            .map(|s| s.as_str())
            .ok_or(TokenizerError::InvalidTokenId {
                id,
                vocab_size: self.tokens.len(),
            })
    }

    /// Get the id for a token string, exact match only.
    #[inline]
    pub fn id_of(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    /// The rendered form of the single-space token.
    #[inline]
    pub fn space_str(&self) -> &str {
        self.tokens[self.special.space as usize].as_str()
    }

    /// Number of entries in the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(tokens: &[&str]) -> Vec<CompactString> {
        tokens.iter().map(|s| CompactString::new(s)).collect()
    }

    #[test]
    fn test_forward_and_reverse_lookup() {
        let vocab = VocabTable::from_entries(entries(&["<unk>", "<s>", "\u{2581}", "ab"])).unwrap();

        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.token(0).unwrap(), "<unk>");
        assert_eq!(vocab.token(3).unwrap(), "ab");
        assert_eq!(vocab.id_of("ab"), Some(3));
        assert_eq!(vocab.id_of("a"), None);
    }

    #[test]
    fn test_out_of_range_id() {
        let vocab = VocabTable::from_entries(entries(&["<unk>", "<s>", "\u{2581}"])).unwrap();

        let err = vocab.token(3).unwrap_err();
        assert!(matches!(
            err,
            TokenizerError::InvalidTokenId { id: 3, vocab_size: 3 }
        ));
    }

    #[test]
    fn test_special_ids() {
        let vocab = VocabTable::from_entries(entries(&["<unk>", "<s>", "x", "\u{2581}"])).unwrap();

        assert_eq!(vocab.special.unk, 0);
        assert_eq!(vocab.special.bos, 1);
        assert_eq!(vocab.special.space, 3);
        assert_eq!(vocab.space_str(), "\u{2581}");
    }

    #[test]
    fn test_missing_space_token_is_rejected() {
        let err = VocabTable::from_entries(entries(&["<unk>", "<s>", "a"])).unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidVocab(_)));
    }

    #[test]
    fn test_too_few_entries_is_rejected() {
        let err = VocabTable::from_entries(entries(&["<unk>"])).unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidVocab(_)));
    }

    #[test]
    fn test_empty_token_string_is_allowed() {
        let vocab = VocabTable::from_entries(entries(&["<unk>", "<s>", "\u{2581}", ""])).unwrap();
        assert_eq!(vocab.token(3).unwrap(), "");
        assert_eq!(vocab.id_of(""), Some(3));
    }
}
