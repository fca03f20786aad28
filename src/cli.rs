//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Braille document tool: convert, rewrap and inspect BRF/BZY files.
#[derive(Parser, Debug)]
#[command(name = "brailledit", version, about)]
pub struct Cli {
    /// Configuration file (defaults to the XDG config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert between formats, chosen by file extension
    Convert { input: PathBuf, output: PathBuf },

    /// Rewrap long lines and save the result
    Rewrap {
        input: PathBuf,
        output: PathBuf,
        /// First line to rewrap (zero-based)
        #[arg(long, default_value_t = 0)]
        from_line: usize,
        /// Line width to wrap to (defaults to the file or config value)
        #[arg(long)]
        chars_per_line: Option<usize>,
    },

    /// Print layout and size of a document
    Info { input: PathBuf },

    /// Show ASCII braille text as Unicode braille cells
    Cells { text: String },
}
