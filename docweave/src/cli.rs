//! Command-line interface definitions for docweave

use clap::{Parser, Subcommand};
use docweave::{Engine, WalkMode};
use std::path::PathBuf;

/// CLI structure for the docweave application
#[derive(Parser)]
#[command(name = "docweave")]
#[command(version)]
#[command(about = "Edit Word documents as HTML markup", long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./docweave.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for docweave
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a .docx file to HTML markup
    Import {
        /// Input .docx file
        input: PathBuf,

        /// Output file for the markup (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert HTML markup to a .docx file
    Export {
        /// Input markup file
        input: PathBuf,

        /// Output .docx file (defaults to the configured output file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// DOCX export engine
        #[arg(long, value_enum)]
        engine: Option<Engine>,

        /// How inline formatting inside blocks is exported
        #[arg(long, value_enum)]
        walk: Option<WalkMode>,
    },

    /// Show the structured document built from HTML markup
    Inspect {
        /// Input markup file
        input: PathBuf,

        /// How inline formatting inside blocks is exported
        #[arg(long, value_enum)]
        walk: Option<WalkMode>,
    },

    /// Load a .docx file, optionally apply edited markup, and save it
    Edit {
        /// Input .docx file
        input: PathBuf,

        /// Markup file replacing the imported content before saving
        #[arg(short, long, value_name = "EDITED")]
        markup: Option<PathBuf>,

        /// Directory to save the edited document in
        #[arg(short = 'd', long = "dir", default_value = ".")]
        dir: PathBuf,
    },
}
