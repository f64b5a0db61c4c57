//! CLI commands for the mistok tokenizer.

pub mod decode;
pub mod encode;

pub use decode::DecodeCommand;
pub use encode::EncodeCommand;

use anyhow::{Context, Result};
use mistok::Tokenizer;
use std::path::Path;

/// Load a tokenizer from the two blob files.
pub fn load_tokenizer(vocab_path: &Path, merges_path: &Path) -> Result<Tokenizer> {
    let vocab_blob = std::fs::read_to_string(vocab_path)
        .with_context(|| format!("failed to read vocabulary blob {}", vocab_path.display()))?;
    let merges_blob = std::fs::read_to_string(merges_path)
        .with_context(|| format!("failed to read merge blob {}", merges_path.display()))?;

    Tokenizer::from_blobs(&vocab_blob, &merges_blob).context("failed to build tokenizer")
}
