//! Decode command implementation.

use clap::Parser;
use std::path::PathBuf;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    /// Path to the base64 vocabulary blob
    #[arg(long)]
    pub vocab: PathBuf,

    /// Path to the base64 merge-table blob
    #[arg(long)]
    pub merges: PathBuf,

    /// Whitespace-separated token IDs ("-" reads from stdin)
    #[arg(short, long)]
    pub input: String,

    /// Treat the first ID as ordinary content, not a beginning-of-sequence token
    #[arg(long, default_value_t = false)]
    pub no_bos: bool,

    /// Keep the artificial leading space instead of stripping it
    #[arg(long, default_value_t = false)]
    pub no_preceding_space: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

use anyhow::{Context, Result as AnyhowResult};

pub fn run(cmd: DecodeCommand) -> AnyhowResult<()> {
    let tokenizer = super::load_tokenizer(&cmd.vocab, &cmd.merges)?;

    let input = if cmd.input == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        cmd.input
    };

    let ids = input
        .split_whitespace()
        .map(|tok| tok.parse::<u32>().with_context(|| format!("invalid token id '{tok}'")))
        .collect::<AnyhowResult<Vec<u32>>>()?;

    let text = tokenizer.decode(&ids, !cmd.no_bos, !cmd.no_preceding_space)?;

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            println!("Decoded {} tokens to {}", ids.len(), path.display());
        }
        None => {
            println!("{}", text);
        }
    }

    Ok(())
}
