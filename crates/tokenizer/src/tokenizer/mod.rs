//! The tokenizer entry points.
//!
//! [`Tokenizer`] bundles the immutable vocabulary and merge tables into one
//! context object built once at startup. Encoding and decoding borrow it
//! read-only, and every encode call owns its private scheduler state, so a
//! single instance may serve many threads without further locking.

use compact_str::format_compact;
use mistok_core::{MergeScheduler, MergeTable, Result, VocabTable};
use tracing::{debug, warn};

use crate::io;

/// BPE tokenizer reproducing the reference Mistral vocabulary bit-for-bit.
///
/// # Construction
///
/// Use [`Tokenizer::from_blobs`] with the two persisted payloads (base64
/// vocabulary text, base64 binary merge table), or [`Tokenizer::new`] with
/// already-built tables.
pub struct Tokenizer {
    vocab: VocabTable,
    merges: MergeTable,
}

impl Tokenizer {
    /// Create a tokenizer from already-constructed tables.
    pub fn new(vocab: VocabTable, merges: MergeTable) -> Self {
        debug!(
            vocab_size = vocab.len(),
            merge_count = merges.len(),
            space_id = vocab.special.space,
            "tokenizer initialized"
        );

        Self { vocab, merges }
    }

    /// Create a tokenizer from the two persisted base64 blobs.
    ///
    /// Fails if either blob is malformed or the merge table references ids
    /// outside the vocabulary.
    pub fn from_blobs(vocab_blob: &str, merges_blob: &str) -> Result<Self> {
        let vocab = io::load_vocab(vocab_blob)?;
        let merges = io::load_merges(merges_blob, &vocab)?;
        Ok(Self::new(vocab, merges))
    }

    /// Encode text into token ids.
    ///
    /// * `add_bos` - prepend the beginning-of-sequence token (id 1).
    /// * `add_preceding_space` - prepend one literal space to the text before
    ///   tokenizing, matching the reference tokenizer's default.
    ///
    /// Empty input returns an empty sequence regardless of flags. Characters
    /// absent from the vocabulary fall back to their `<0xHH>` byte tokens;
    /// encoding never fails.
    pub fn encode(&self, text: &str, add_bos: bool, add_preceding_space: bool) -> Vec<u32> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut ids = Vec::with_capacity(text.len() + 1);
        if add_bos {
            ids.push(self.vocab.special.bos);
        }

        // Spaces are carried through merge scheduling as the rendered
        // single-space token, so runs of spaces can merge like any other pair.
        let mut altered = String::with_capacity(text.len() + 1);
        if add_preceding_space {
            altered.push(' ');
        }
        altered.push_str(text);
        let altered = altered.replace(' ', self.vocab.space_str());

        let mut buf = [0u8; 4];
        for c in altered.chars() {
            let encoded: &str = c.encode_utf8(&mut buf);
            match self.vocab.id_of(encoded) {
                Some(id) => ids.push(id),
                None => {
                    for byte in encoded.bytes() {
                        let fallback = format_compact!("<0x{byte:02X}>");
                        match self.vocab.id_of(&fallback) {
                            Some(id) => ids.push(id),
                            None => {
                                // A complete vocabulary has a token for every
                                // byte; substitute <unk> rather than fail.
                                warn!(
                                    character = %c,
                                    byte,
                                    "no byte-fallback token, substituting <unk>"
                                );
                                if let Some(last) = ids.last_mut() {
                                    *last = self.vocab.special.unk;
                                }
                            }
                        }
                    }
                }
            }
        }

        MergeScheduler::new(&self.vocab, &self.merges).merge(&ids)
    }

    /// Decode token ids back into text.
    ///
    /// * `has_bos` - skip the first id, assumed (but not verified) to be the
    ///   beginning-of-sequence token.
    /// * `strip_preceding_space` - drop the first character of the result,
    ///   undoing the artificial leading space added at encode time.
    ///
    /// Byte-fallback tokens are reassembled into raw bytes before UTF-8
    /// decoding; malformed byte sequences become replacement characters.
    /// Fails only when an id falls outside the vocabulary.
    pub fn decode(&self, ids: &[u32], has_bos: bool, strip_preceding_space: bool) -> Result<String> {
        let start = usize::from(has_bos);

        let mut bytes = Vec::with_capacity(ids.len() * 4);
        for &id in ids.iter().skip(start) {
            let token = self.vocab.token(id)?;
            match byte_fallback_value(token) {
                Some(byte) => bytes.push(byte),
                None => bytes.extend_from_slice(token.as_bytes()),
            }
        }

        let text = String::from_utf8_lossy(&bytes).replace(self.vocab.space_str(), " ");

        // The leading space must be removed at string level, not token level:
        // consecutive spaces may have merged into a single token.
        if strip_preceding_space {
            let mut chars = text.chars();
            chars.next();
            Ok(chars.as_str().to_string())
        } else {
            Ok(text)
        }
    }

    /// Number of entries in the vocabulary.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// The underlying vocabulary table.
    pub fn vocab(&self) -> &VocabTable {
        &self.vocab
    }
}

/// Parse a byte-fallback token of the form `<0xHH>` into its byte value.
fn byte_fallback_value(token: &str) -> Option<u8> {
    if token.len() == 6 && token.starts_with("<0x") && token.ends_with('>') {
        u8::from_str_radix(&token[3..5], 16).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::{format_compact, CompactString};
    use mistok_core::MergeTable;

    /// Build a vocabulary shaped like the reference one: <unk>, <s>, </s>,
    /// all 256 byte-fallback tokens, the space token, then test entries.
    fn reference_style_vocab(extra: &[&str]) -> VocabTable {
        let mut entries: Vec<CompactString> =
            vec!["<unk>".into(), "<s>".into(), "</s>".into()];
        for byte in 0..=255u8 {
            entries.push(format_compact!("<0x{byte:02X}>"));
        }
        entries.push(CompactString::new("\u{2581}"));
        entries.extend(extra.iter().map(CompactString::new));
        VocabTable::from_entries(entries).unwrap()
    }

    fn merges(vocab: &VocabTable, rules: &[(&str, &str)]) -> MergeTable {
        MergeTable::from_pairs(
            rules
                .iter()
                .map(|(l, r)| (vocab.id_of(l).unwrap(), vocab.id_of(r).unwrap())),
        )
    }

    fn word_tokenizer() -> Tokenizer {
        let vocab = reference_style_vocab(&["a", "b", "ab", "\u{2581}ab"]);
        let merges = merges(&vocab, &[("a", "b"), ("\u{2581}", "ab")]);
        Tokenizer::new(vocab, merges)
    }

    #[test]
    fn test_empty_input_ignores_flags() {
        let tok = word_tokenizer();
        assert!(tok.encode("", true, true).is_empty());
        assert!(tok.encode("", false, false).is_empty());
    }

    #[test]
    fn test_bos_is_prepended() {
        let tok = word_tokenizer();
        let ids = tok.encode("ab", true, false);
        assert_eq!(ids[0], 1);

        let ids = tok.encode("ab", false, false);
        assert_ne!(ids[0], 1);
    }

    #[test]
    fn test_preceding_space_merges_with_word() {
        let tok = word_tokenizer();
        let expected = tok.vocab().id_of("\u{2581}ab").unwrap();
        assert_eq!(tok.encode("ab", false, true), vec![expected]);
    }

    #[test]
    fn test_roundtrip_with_default_flags() {
        let tok = word_tokenizer();
        let ids = tok.encode("ab ab", true, true);

        let word = tok.vocab().id_of("\u{2581}ab").unwrap();
        assert_eq!(ids, vec![1, word, word]);
        assert_eq!(tok.decode(&ids, true, true).unwrap(), "ab ab");
    }

    #[test]
    fn test_all_ids_within_vocabulary() {
        let tok = word_tokenizer();
        let vocab_size = tok.vocab_size() as u32;
        for id in tok.encode("ab a\u{1F600}b  ab", true, true) {
            assert!(id < vocab_size);
        }
    }

    #[test]
    fn test_space_runs_merge_like_the_reference() {
        let vocab = reference_style_vocab(&["a", "\u{2581}\u{2581}", "\u{2581}\u{2581}\u{2581}\u{2581}"]);
        let rules = merges(
            &vocab,
            &[
                ("\u{2581}", "\u{2581}"),
                ("\u{2581}\u{2581}", "\u{2581}\u{2581}"),
            ],
        );
        let tok = Tokenizer::new(vocab, rules);

        // Three input spaces plus the artificial leading space: the pairs
        // merge left to right, then the two pairs merge into one token. A
        // naive per-space tokenization would emit four space tokens.
        let ids = tok.encode("   a", false, true);
        let four = tok.vocab().id_of("\u{2581}\u{2581}\u{2581}\u{2581}").unwrap();
        let a = tok.vocab().id_of("a").unwrap();
        assert_eq!(ids, vec![four, a]);

        assert_eq!(tok.decode(&ids, false, true).unwrap(), "   a");
    }

    #[test]
    fn test_byte_fallback_roundtrip_for_unknown_character() {
        let tok = word_tokenizer();

        // A 4-byte UTF-8 character absent from the vocabulary becomes four
        // distinct byte-fallback tokens.
        let ids = tok.encode("\u{1F600}", false, false);
        assert_eq!(ids.len(), 4);
        for window in ids.windows(2) {
            assert_ne!(window[0], window[1]);
        }

        assert_eq!(tok.decode(&ids, false, false).unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_missing_fallback_token_substitutes_unk() {
        // No byte-fallback tokens at all: the most recently emitted id is
        // overwritten with <unk> instead of failing.
        let vocab = VocabTable::from_entries(
            ["<unk>", "<s>", "\u{2581}", "a"]
                .into_iter()
                .map(CompactString::new)
                .collect(),
        )
        .unwrap();
        let tok = Tokenizer::new(vocab, MergeTable::new());

        assert_eq!(tok.encode("a\u{e9}", false, false), vec![0]);
    }

    #[test]
    fn test_decode_skips_bos_without_verifying() {
        let tok = word_tokenizer();
        let ab = tok.vocab().id_of("ab").unwrap();

        assert_eq!(tok.decode(&[1, ab], true, false).unwrap(), "ab");
        // The first id is skipped even when it is not actually BOS.
        assert_eq!(tok.decode(&[ab, ab], true, false).unwrap(), "ab");
    }

    #[test]
    fn test_decode_out_of_range_id_fails() {
        let tok = word_tokenizer();
        let err = tok.decode(&[u32::MAX], false, false).unwrap_err();
        assert!(matches!(
            err,
            mistok_core::TokenizerError::InvalidTokenId { .. }
        ));
    }

    #[test]
    fn test_decode_malformed_bytes_substitute_replacement_char() {
        let tok = word_tokenizer();
        let stray = tok.vocab().id_of("<0xFF>").unwrap();

        assert_eq!(tok.decode(&[stray], false, false).unwrap(), "\u{FFFD}");
    }

    #[test]
    fn test_decode_empty_input() {
        let tok = word_tokenizer();
        assert_eq!(tok.decode(&[], true, true).unwrap(), "");
    }

    #[test]
    fn test_from_blobs_end_to_end() {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;

        let entries = ["<unk>", "<s>", "\u{2581}", "a", "b", "ab"];
        let vocab_blob = STANDARD.encode(entries.join("\n"));

        // One merge entry: (a, b) -> rank 0.
        let mut merge_bytes = Vec::new();
        merge_bytes.extend_from_slice(&3u16.to_le_bytes());
        merge_bytes.extend_from_slice(&4u16.to_le_bytes());
        let merges_blob = STANDARD.encode(merge_bytes);

        let tok = Tokenizer::from_blobs(&vocab_blob, &merges_blob).unwrap();
        assert_eq!(tok.vocab_size(), 6);
        assert_eq!(tok.encode("ab", false, false), vec![5]);
        assert_eq!(tok.decode(&[5], false, false).unwrap(), "ab");
    }

    #[test]
    fn test_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tokenizer>();
    }
}
