use clap::{Parser, Subcommand};
use docbatch_common::Operation;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docbatch")]
#[command(author, version, about = "Batch convert Word documents to PDF and PDFs to JPG")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a batch of files with a live status grid
    Run {
        /// Conversion to apply (word-to-pdf, pdf-to-jpg)
        #[arg(short = 'O', long, value_parser = parse_operation)]
        operation: Operation,

        /// Output directory (defaults to the configured one, then the desktop)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of files converted at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Report failed conversions as failed instead of succeeded
        #[arg(long)]
        strict: bool,

        /// Descend into sub-directories of directory inputs
        #[arg(short, long)]
        recursive: bool,

        /// Files or directories to convert
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// List folders to pick an output directory from
    Browse {
        /// Folder to list (lists root locations if omitted)
        path: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available conversion operations
    Operations,

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn parse_operation(s: &str) -> Result<Operation, String> {
    s.parse().map_err(|e: docbatch_common::Error| e.to_string())
}
