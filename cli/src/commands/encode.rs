//! Encode command implementation.

use clap::Parser;
use std::path::PathBuf;

/// Encode command arguments.
#[derive(Parser)]
pub struct EncodeCommand {
    /// Path to the base64 vocabulary blob
    #[arg(long)]
    pub vocab: PathBuf,

    /// Path to the base64 merge-table blob
    #[arg(long)]
    pub merges: PathBuf,

    /// Text to encode ("-" reads from stdin)
    #[arg(short, long)]
    pub input: String,

    /// Do not prepend the beginning-of-sequence token
    #[arg(long, default_value_t = false)]
    pub no_bos: bool,

    /// Do not prepend the artificial leading space
    #[arg(long, default_value_t = false)]
    pub no_preceding_space: bool,

    /// Print token IDs as a JSON array
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

use anyhow::Result as AnyhowResult;

pub fn run(cmd: EncodeCommand) -> AnyhowResult<()> {
    let tokenizer = super::load_tokenizer(&cmd.vocab, &cmd.merges)?;

    // Read input text (from stdin if "-")
    let input_text = if cmd.input == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        cmd.input
    };

    let ids = tokenizer.encode(&input_text, !cmd.no_bos, !cmd.no_preceding_space);

    let output = if cmd.json {
        serde_json::to_string(&ids)?
    } else {
        let ids_str: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        ids_str.join(" ")
    };

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &output)?;
            println!("Encoded {} tokens to {}", ids.len(), path.display());
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
