//! Merge rule storage for BPE.
//!
//! Merge rules are keyed by token-id pairs rather than strings for fast
//! comparison; vocabulary entries are unique, so the two keyings are
//! interchangeable.

use ahash::AHashMap;

/// A pair of token ids that can be merged.
pub type Pair = (u32, u32);

/// Immutable mapping from mergeable pairs to priority ranks.
///
/// Lower rank = applied earlier. Ranks are unique and strictly increasing in
/// authoring order. Built once from a decoded merge blob and read-only
/// thereafter.
#[derive(Debug, Clone)]
pub struct MergeTable {
    ranks: AHashMap<Pair, u32>,
}

impl MergeTable {
    /// Create an empty merge table (no pair ever merges).
    pub fn new() -> Self {
        Self {
            ranks: AHashMap::new(),
        }
    }

    /// Build a merge table from pairs in authoring order.
    ///
    /// Pairs are assigned ranks 0, 1, 2, ... in iteration order. A pair that
    /// appears twice keeps its first (highest-priority) rank.
    pub fn from_pairs(pairs: impl IntoIterator<Item = Pair>) -> Self {
        let mut ranks = AHashMap::new();

        for (rank, pair) in pairs.into_iter().enumerate() {
            ranks.entry(pair).or_insert(rank as u32);
        }

        Self { ranks }
    }

    /// Get the priority rank for a pair.
    ///
    /// Returns `None` if the pair never merges.
    #[inline]
    pub fn rank_of(&self, pair: Pair) -> Option<u32> {
        self.ranks.get(&pair).copied()
    }

    /// Number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl Default for MergeTable {
    fn default() -> Self {
        Self::new()
    }
}
