// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! patchcheck - EDK2 style patch checker
//!
//! Checks patches in `git format-patch` email form, bare git diffs and git
//! commits against the EDK2 commit message and code conventions.
//!
//! # Features
//!
//! - **Commit message checks**: subject length, Signed-off-by and other
//!   trailers, signature block layout
//! - **Email checks**: author, committer and trailer addresses
//! - **Diff checks**: CRLF line endings, tabs, trailing whitespace and
//!   deprecated debug macros, with per-path exceptions
//! - **Reports**: full text, one line per patch, or JSON
//!
//! # Example
//!
//! ```no_run
//! use patchcheck::check::Runner;
//! use patchcheck::config::PatchCheckConfig;
//! use patchcheck::rules::PathRules;
//!
//! let config = PatchCheckConfig::load().unwrap();
//! let paths = PathRules::from_config(&config.paths).unwrap();
//!
//! let report = Runner::new(&config, &paths).run(&["HEAD~3..HEAD"]).unwrap();
//! println!("{} error(s)", report.error_count());
//! ```

// Module declarations
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod patch;
pub mod report;
pub mod rules;

// Re-exports for convenience
pub use config::PatchCheckConfig;
pub use error::{PatchCheckError, Result};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of patchcheck.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        match (GIT_SHA, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => {
                format!("{} ({} {})", VERSION, &sha[..7.min(sha.len())], date)
            }
            (Some(sha), None) => {
                format!("{} ({})", VERSION, &sha[..7.min(sha.len())])
            }
            _ => VERSION.to_string(),
        }
    }
}
