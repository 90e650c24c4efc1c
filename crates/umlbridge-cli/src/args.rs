//! Command-line argument definitions for the umlbridge CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Each subcommand reads diagram text from a file or from
//! standard input (`-`).

use clap::{Parser, Subcommand};

/// Command-line arguments for the umlbridge tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import diagram text into a fresh workspace and print the computed layout
    Import {
        /// Path to the input file, or `-` for standard input
        input: String,

        /// Write an SVG preview of the layout to this path
        #[arg(long)]
        svg: Option<String>,
    },

    /// Import diagram text, then serialize the selected elements back to text
    Export {
        /// Path to the input file, or `-` for standard input
        input: String,

        /// Path to the output file; standard output when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Names of the elements to export; all top-level classes when omitted
        #[arg(long, num_args = 1..)]
        select: Vec<String>,
    },
}
