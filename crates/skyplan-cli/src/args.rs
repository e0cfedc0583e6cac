//! Command-line argument definitions for the Skyplan CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input document, the report path, the
//! configuration file and a handful of per-run overrides.

use clap::Parser;

/// Command-line arguments for the Skyplan architecture tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram document (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output report (JSON)
    #[arg(short, long, default_value = "report.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Force a view mode (cartesian, isometric)
    #[arg(long)]
    pub view_mode: Option<String>,

    /// Tier axis direction (left-to-right, top-to-bottom)
    #[arg(long)]
    pub direction: Option<String>,

    /// Billing region used for pricing
    #[arg(long)]
    pub region: Option<String>,

    /// Keep the positions stored in the document
    #[arg(long)]
    pub no_layout: bool,
}
