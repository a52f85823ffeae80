use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// symremap - rewrite the source paths recorded in debug symbols
#[derive(Debug, Parser)]
#[command(name = "symremap", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remap document paths and write the re-emitted symbols as XML.
    Rewrite {
        /// Path to the debug-info tree (JSON).
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Path mapping file: a JSON object of old path to new path.
        #[arg(short, long, value_name = "MAP")]
        map: PathBuf,

        /// Write the XML here instead of stdout.
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Skip scope containment checks for trusted input.
        #[arg(long)]
        trusted: bool,

        /// Do not carry the user entry point over.
        #[arg(long)]
        no_entry_point: bool,
    },

    /// List source documents and how many functions reference them.
    Documents {
        /// Path to the debug-info tree (JSON).
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show paths after applying this mapping file.
        #[arg(short, long, value_name = "MAP")]
        map: Option<PathBuf>,
    },
}
