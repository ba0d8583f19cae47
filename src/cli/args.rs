// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Verbosity;
use crate::report::OutputFormat;

/// patchcheck - EDK2 style patch checker
///
/// Checks patch files, standard input or git commits for commit message,
/// email address and code formatting problems.
#[derive(Parser, Debug)]
#[command(name = "patchcheck")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Check patches against EDK2 commit and code conventions", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Patch files, `-` for stdin, git revisions, or `-N` commit counts
    #[arg(value_name = "PATCHES")]
    pub patches: Vec<String>,

    /// Print one line per patch
    #[arg(long, conflicts_with = "silent")]
    pub oneline: bool,

    /// Print nothing; only the exit code reports the result
    #[arg(long)]
    pub silent: bool,

    /// Output format for machine-readable output
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Default number of commits to check for each git revision
    #[arg(short = 'n', long, value_name = "N")]
    pub max_count: Option<usize>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Verbosity requested on the command line, if any.
    pub fn verbosity(&self) -> Option<Verbosity> {
        if self.silent {
            Some(Verbosity::Silent)
        } else if self.oneline {
            Some(Verbosity::Oneline)
        } else {
            None
        }
    }

    /// The effective output format.
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Text)
    }
}
