//! Core BPE data model and merge scheduling.

pub mod merges;
pub mod priority;
pub mod scheduler;
pub mod vocab;

pub use merges::{MergeTable, Pair};
pub use priority::{CandidateQueue, MergeCandidate};
pub use scheduler::MergeScheduler;
pub use vocab::{SpecialTokens, VocabTable, BOS_ID, SPIECE_UNDERLINE, UNK_ID};
