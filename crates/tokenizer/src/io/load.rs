//! Blob decoding for pretrained vocabularies and merge tables.
//!
//! Both payloads ship base64-wrapped. The vocabulary decodes to UTF-8 text
//! with one entry per line (line number = token id); the merge table decodes
//! to little-endian 16-bit token-id pairs in priority order. Any decoding
//! failure is fatal at construction time: a tokenizer built from a broken
//! blob cannot serve any request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use compact_str::CompactString;
use mistok_core::{MergeTable, Result, TokenizerError, VocabTable};

/// Decode a base64-wrapped vocabulary blob into a [`VocabTable`].
///
/// The decoded bytes must be UTF-8 text with entries separated by `\n`;
/// entry order is preserved as id order.
pub fn load_vocab(blob: &str) -> Result<VocabTable> {
    let bytes = STANDARD
        .decode(blob.trim())
        .map_err(|e| TokenizerError::InvalidVocab(format!("base64 decode failed: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| TokenizerError::InvalidVocab(format!("not valid UTF-8: {e}")))?;

    VocabTable::from_entries(text.split('\n').map(CompactString::new).collect())
}

/// Decode a base64-wrapped merge blob into a [`MergeTable`].
///
/// The decoded bytes form consecutive little-endian `u16` token-id pairs;
/// entry `k` defines the merge with priority rank `k`. Entries referencing
/// ids outside the vocabulary are rejected.
pub fn load_merges(blob: &str, vocab: &VocabTable) -> Result<MergeTable> {
    let bytes = STANDARD
        .decode(blob.trim())
        .map_err(|e| TokenizerError::InvalidMerges(format!("base64 decode failed: {e}")))?;

    if bytes.len() % 4 != 0 {
        return Err(TokenizerError::InvalidMerges(format!(
            "blob length {} is not a whole number of id pairs",
            bytes.len()
        )));
    }

    let vocab_size = vocab.len() as u32;
    let mut pairs = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        let left = u32::from(u16::from_le_bytes([chunk[0], chunk[1]]));
        let right = u32::from(u16::from_le_bytes([chunk[2], chunk[3]]));

        if left >= vocab_size || right >= vocab_size {
            return Err(TokenizerError::InvalidMerges(format!(
                "merge entry ({left}, {right}) references an id outside the \
                 vocabulary of {vocab_size} entries"
            )));
        }

        pairs.push((left, right));
    }

    Ok(MergeTable::from_pairs(pairs))
}
