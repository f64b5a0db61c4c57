//! The BPE merge scheduler.
//!
//! Turns an initial per-character token sequence into the final merged
//! sequence by repeatedly applying the highest-priority valid adjacent merge.
//! Equal-rank merges resolve strictly left to right, and candidate
//! invalidation is handled with tombstones rather than queue removal, which
//! is what makes the output match the reference tokenizer on inputs with
//! repeated characters or several equal-priority pairs.

use crate::core::merges::MergeTable;
use crate::core::priority::{CandidateQueue, MergeCandidate};
use crate::core::vocab::VocabTable;
use compact_str::CompactString;

/// A node in the doubly linked token sequence.
///
/// Nodes live in an arena and link to each other by index, never by
/// reference: a pending queue entry may still hold the handle of a node that
/// has since been superseded, so nodes are tombstoned instead of removed and
/// never reused.
#[derive(Debug, Clone)]
struct TokenNode {
    /// Stable index assigned at construction, used only for tie-breaking.
    orig_pos: usize,
    token_id: u32,
    prev: Option<usize>,
    next: Option<usize>,
    /// Set when a merge consumes this node or its adjacency changes.
    deleted: bool,
}

/// Exhaustive merge scheduling over one token sequence.
///
/// Borrows the shared read-only tables; all mutable state (arena and queue)
/// is private to a single [`merge`](MergeScheduler::merge) call, so one
/// scheduler may serve concurrent callers.
pub struct MergeScheduler<'a> {
    vocab: &'a VocabTable,
    merges: &'a MergeTable,
}

impl<'a> MergeScheduler<'a> {
    /// Create a scheduler over the given vocabulary and merge table.
    pub fn new(vocab: &'a VocabTable, merges: &'a MergeTable) -> Self {
        Self { vocab, merges }
    }

    /// Apply all merges in priority order and return the final id sequence.
    pub fn merge(&self, ids: &[u32]) -> Vec<u32> {
        if ids.len() < 2 {
            return ids.to_vec();
        }

        // The fractional tie-break divides by the sequence length: positions
        // are 0..len, so the fraction stays strictly below 1 and never
        // reorders distinct integer ranks.
        let scale = ids.len() as f64;

        let mut nodes: Vec<TokenNode> = Vec::with_capacity(ids.len() * 2);
        for (i, &id) in ids.iter().enumerate() {
            nodes.push(TokenNode {
                orig_pos: i,
                token_id: id,
                prev: i.checked_sub(1),
                next: if i + 1 < ids.len() { Some(i + 1) } else { None },
                deleted: false,
            });
        }
        let mut head = 0usize;

        let mut queue = CandidateQueue::with_capacity(ids.len());
        for i in 0..ids.len() - 1 {
            self.push_candidate(&nodes, i, scale, &mut queue);
        }

        while let Some(cand) = queue.pop() {
            let left = cand.left;

            // Stale candidate: the adjacency no longer exists.
            if nodes[left].deleted {
                continue;
            }
            let Some(right) = nodes[left].next else {
                continue;
            };
            if nodes[right].deleted {
                continue;
            }

            // Both endpoints are being replaced by the merged node.
            nodes[left].deleted = true;
            nodes[right].deleted = true;

            // The predecessor gains a new successor, so any candidate already
            // queued for it is out of date. Tombstone it and splice in a fresh
            // copy; the stale queue entry then fails the liveness check above
            // instead of acting on a mutated node.
            if let Some(old_prev) = nodes[left].prev {
                nodes[old_prev].deleted = true;

                let fresh = TokenNode {
                    deleted: false,
                    ..nodes[old_prev].clone()
                };
                let fresh_idx = nodes.len();
                nodes.push(fresh);

                nodes[left].prev = Some(fresh_idx);
                match nodes[fresh_idx].prev {
                    Some(pp) => nodes[pp].next = Some(fresh_idx),
                    None => head = fresh_idx,
                }
            }

            // Unresolvable merge result: abandon the candidate. The endpoints
            // stay tombstoned but linked, and output traversal ignores
            // tombstones, so the emitted sequence is unchanged.
            let Some(merged_id) = self.vocab.id_of(&cand.result) else {
                continue;
            };

            let merged_idx = nodes.len();
            nodes.push(TokenNode {
                orig_pos: nodes[left].orig_pos,
                token_id: merged_id,
                prev: nodes[left].prev,
                next: nodes[right].next,
                deleted: false,
            });

            match nodes[merged_idx].prev {
                Some(prev) => {
                    nodes[prev].next = Some(merged_idx);
                    self.push_candidate(&nodes, prev, scale, &mut queue);
                }
                None => head = merged_idx,
            }

            if let Some(next) = nodes[merged_idx].next {
                nodes[next].prev = Some(merged_idx);
                self.push_candidate(&nodes, merged_idx, scale, &mut queue);
            }
        }

        let mut merged = Vec::with_capacity(ids.len());
        let mut cursor = Some(head);
        while let Some(idx) = cursor {
            merged.push(nodes[idx].token_id);
            cursor = nodes[idx].next;
        }
        merged
    }

    /// Compute a merge candidate for `left` and its current successor, if the
    /// pair has a merge rule, and enqueue it.
    fn push_candidate(
        &self,
        nodes: &[TokenNode],
        left: usize,
        scale: f64,
        queue: &mut CandidateQueue,
    ) {
        let Some(right) = nodes[left].next else {
            return;
        };
        let pair = (nodes[left].token_id, nodes[right].token_id);
        let Some(rank) = self.merges.rank_of(pair) else {
            return;
        };

        // Ids in the sequence always come from the vocabulary; a miss here
        // means inconsistent tables, treated as "this pair never merges".
        let (Ok(left_str), Ok(right_str)) = (self.vocab.token(pair.0), self.vocab.token(pair.1))
        else {
            return;
        };
        let mut result = CompactString::new(left_str);
        result.push_str(right_str);

        queue.push(MergeCandidate {
            left,
            priority: f64::from(rank) + nodes[left].orig_pos as f64 / scale,
            result,
        });
    }
}
