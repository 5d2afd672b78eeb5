//! Command-line argument definitions for the Merrow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input file, the grammar to run and
//! the output format; content-based grammar detection is deliberately not
//! offered.

use clap::{Parser, ValueEnum};

/// Which diagram grammar to run over the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Grammar {
    /// Mermaid `flowchart`/`graph` sources.
    Flowchart,
    /// Mermaid `classDiagram` sources.
    Class,
}

/// Command-line arguments for the Merrow diagram parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Grammar to parse the input with
    #[arg(short, long, value_enum, default_value = "flowchart")]
    pub grammar: Grammar,

    /// Emit the parsed model as JSON instead of a summary line
    #[arg(long)]
    pub json: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
