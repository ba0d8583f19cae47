// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines all configuration structures that can be loaded from
//! patchcheck.toml.

use serde::{Deserialize, Serialize};

/// The main configuration structure for patchcheck.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PatchCheckConfig {
    /// Commit message rules.
    pub message: MessageConfig,

    /// Diff content rules.
    pub diff: DiffConfig,

    /// Extra path exceptions.
    pub paths: PathsConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

impl PatchCheckConfig {
    /// Load configuration from the default locations.
    pub fn load() -> crate::error::Result<Self> {
        super::loader::load_config()
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }
}

/// Commit message rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Maximum length of the subject line.
    pub max_subject_length: usize,

    /// Maximum length of a subject line naming a CVE.
    pub max_cve_subject_length: usize,

    /// Body lines longer than this produce a warning.
    pub max_body_line_length: usize,

    /// Whether a Signed-off-by trailer is required.
    pub require_signed_off_by: bool,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            max_subject_length: 75,
            max_cve_subject_length: 92,
            max_body_line_length: 75,
            require_signed_off_by: true,
        }
    }
}

/// Diff content rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Flag trailing whitespace on added lines.
    pub check_trailing_whitespace: bool,

    /// Flag EFI_D_* debug print levels on added lines.
    pub check_debug_macros: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            check_trailing_whitespace: true,
            check_debug_macros: true,
        }
    }
}

/// Glob patterns extending the built-in path exceptions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Paths exempt from CRLF enforcement.
    pub lf_only: Vec<String>,

    /// Paths exempt from both the tab and the CRLF rule.
    pub git_internal: Vec<String>,

    /// Paths exempt from the tab rule.
    pub tabs_allowed: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to use colors on a terminal.
    pub color: bool,

    /// Default verbosity.
    pub verbosity: Verbosity,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            verbosity: Verbosity::Normal,
        }
    }
}

/// How much of the report to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Print nothing.
    Silent,
    /// One result line per patch.
    Oneline,
    /// Full report.
    Normal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PatchCheckConfig::default();
        assert_eq!(config.message.max_subject_length, 75);
        assert_eq!(config.message.max_cve_subject_length, 92);
        assert!(config.message.require_signed_off_by);
        assert!(config.diff.check_trailing_whitespace);
        assert_eq!(config.output.verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_order() {
        assert!(Verbosity::Silent < Verbosity::Oneline);
        assert!(Verbosity::Oneline < Verbosity::Normal);
    }

    #[test]
    fn test_config_serialization() {
        let config = PatchCheckConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("max_subject_length"));
        assert!(toml_str.contains("verbosity = \"normal\""));
    }
}
