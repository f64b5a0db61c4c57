//! Priority queue over merge candidates.
//!
//! The merge scheduler needs min-extraction: the candidate with the smallest
//! priority key is popped first. Uses an 8-ary heap for better cache locality
//! than a binary heap, with the candidate ordering reversed so the heap's
//! maximum is the numerically smallest priority.

use compact_str::CompactString;
use dary_heap::OctonaryHeap;

/// A candidate merge between a node and its successor.
///
/// `priority` is `rank + orig_pos / sequence_len`: the fractional term is
/// strictly below 1 and strictly increasing in original position, so equal
/// ranks resolve left to right. `result` is the concatenation of the two
/// token strings, resolved against the vocabulary when the candidate is
/// popped.
#[derive(Debug, Clone)]
pub struct MergeCandidate {
    /// Arena handle of the left node of the pair.
    pub left: usize,
    /// Combined rank + positional tie-break key. Smaller merges earlier.
    pub priority: f64,
    /// Merge-result string, computed when the candidate was enqueued.
    pub result: CompactString,
}

impl PartialEq for MergeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.priority.to_bits() == other.priority.to_bits() && self.left == other.left
    }
}

impl Eq for MergeCandidate {}

// Reversed ordering: the heap is a max-heap, so "greatest" must mean
// "smallest priority key". The left-handle comparison only settles exact
// priority collisions, which cannot occur for distinct positions.
impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.left.cmp(&self.left))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-extraction queue of merge candidates.
///
/// Supports any number of insertions between extractions. Stale candidates
/// are not removed eagerly; the scheduler detects them at pop time via node
/// tombstones.
pub struct CandidateQueue {
    heap: OctonaryHeap<MergeCandidate>,
}

impl CandidateQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: OctonaryHeap::new(),
        }
    }

    /// Create an empty queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
        }
    }

    /// Push a candidate onto the queue.
    #[inline]
    pub fn push(&mut self, candidate: MergeCandidate) {
        self.heap.push(candidate);
    }

    /// Pop the candidate with the smallest priority key.
    ///
    /// Returns `None` on an empty queue.
    #[inline]
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        self.heap.pop()
    }

    /// Number of (potentially stale) entries in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Default for CandidateQueue {
    fn default() -> Self {
        Self::new()
    }
}
