//! Loading of the persisted vocabulary and merge-table blobs.

pub mod load;

pub use load::{load_merges, load_vocab};
