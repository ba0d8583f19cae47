// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Path-based policy exceptions.
//!
//! Paths are compared as recorded in the diff, with forward-slash
//! separators and no normalization.

use crate::config::PathsConfig;
use crate::error::{ConfigError, PatchCheckError, Result};

/// A single path predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatcher {
    /// Path ends with the given text.
    Suffix(&'static str),
    /// Path starts with the given text.
    Prefix(&'static str),
    /// Path equals the given text.
    Exact(&'static str),
    /// Final path component equals the given text.
    Basename(&'static str),
}

impl PathMatcher {
    /// Check whether the path matches.
    pub fn matches(&self, path: &str) -> bool {
        match *self {
            PathMatcher::Suffix(suffix) => path.ends_with(suffix),
            PathMatcher::Prefix(prefix) => path.starts_with(prefix),
            PathMatcher::Exact(exact) => path == exact,
            PathMatcher::Basename(name) => basename(path) == name,
        }
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Shell scripts, identified by extension or by the wrapper directories
/// that hold extension-less scripts. These keep LF line endings.
pub const SCRIPT_CONVENTION_EXCEPTIONS: &[PathMatcher] = &[
    PathMatcher::Suffix(".sh"),
    PathMatcher::Prefix("BaseTools/BinWrappers/PosixLike/"),
    PathMatcher::Prefix("BaseTools/BinPipWrappers/PosixLike/"),
    PathMatcher::Prefix("BaseTools/Bin/CYGWIN_NT-5.1-i686/"),
    PathMatcher::Exact("BaseTools/BuildEnv"),
];

/// Files read by git itself. These use tabs and LF line endings.
pub const GIT_INTERNAL_EXCEPTIONS: &[PathMatcher] = &[
    PathMatcher::Exact(".gitmodules"),
    PathMatcher::Exact("BaseTools/Conf/diff.order"),
];

/// Makefiles require tab-indented recipes.
pub const TABS_ALLOWED_EXCEPTIONS: &[PathMatcher] = &[
    PathMatcher::Basename("Makefile"),
    PathMatcher::Basename("GNUmakefile"),
];

fn any_match(set: &[PathMatcher], path: &str) -> bool {
    set.iter().any(|m| m.matches(path))
}

/// Check whether a path follows shell-script conventions.
pub fn exempt_from_script_convention(filename: &str) -> bool {
    any_match(SCRIPT_CONVENTION_EXCEPTIONS, filename)
}

/// Check whether a path is a git-internal file.
pub fn exempt_from_tab_and_crlf(filename: &str) -> bool {
    any_match(GIT_INTERNAL_EXCEPTIONS, filename)
}

/// Line-ending and tab policy for one file in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePolicy {
    /// Added lines must end with CRLF.
    pub force_crlf: bool,
    /// Added lines must not contain tab characters.
    pub force_notabs: bool,
}

impl Default for FilePolicy {
    fn default() -> Self {
        Self {
            force_crlf: true,
            force_notabs: true,
        }
    }
}

/// The built-in exception tables extended with configured glob patterns.
///
/// Built once at start-up and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct PathRules {
    lf_only: Vec<glob::Pattern>,
    git_internal: Vec<glob::Pattern>,
    tabs_allowed: Vec<glob::Pattern>,
}

impl PathRules {
    /// Rules with only the built-in tables.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Rules with the configured extras appended.
    pub fn from_config(config: &PathsConfig) -> Result<Self> {
        Ok(Self {
            lf_only: compile_patterns("paths.lf_only", &config.lf_only)?,
            git_internal: compile_patterns("paths.git_internal", &config.git_internal)?,
            tabs_allowed: compile_patterns("paths.tabs_allowed", &config.tabs_allowed)?,
        })
    }

    /// Script-convention exemption, including configured extras.
    pub fn exempt_from_script_convention(&self, path: &str) -> bool {
        exempt_from_script_convention(path) || glob_match(&self.lf_only, path)
    }

    /// Git-internal exemption, including configured extras.
    pub fn exempt_from_tab_and_crlf(&self, path: &str) -> bool {
        exempt_from_tab_and_crlf(path) || glob_match(&self.git_internal, path)
    }

    /// Tab exemption for makefiles and configured extras.
    pub fn tabs_allowed(&self, path: &str) -> bool {
        any_match(TABS_ALLOWED_EXCEPTIONS, path) || glob_match(&self.tabs_allowed, path)
    }

    /// Resolve the policy for a file.
    pub fn policy_for(&self, path: &str) -> FilePolicy {
        let mut policy = FilePolicy::default();

        if self.exempt_from_script_convention(path) {
            policy.force_crlf = false;
        }
        if self.exempt_from_tab_and_crlf(path) {
            policy.force_crlf = false;
            policy.force_notabs = false;
        }
        if self.tabs_allowed(path) {
            policy.force_notabs = false;
        }

        tracing::debug!("Policy for {}: {:?}", path, policy);
        policy
    }
}

fn compile_patterns(key: &str, patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| {
                PatchCheckError::Config(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("'{}': {}", p, e),
                })
            })
        })
        .collect()
}

fn glob_match(patterns: &[glob::Pattern], path: &str) -> bool {
    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    patterns.iter().any(|p| p.matches_with(path, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_convention_by_extension() {
        assert!(exempt_from_script_convention("foo.sh"));
        assert!(exempt_from_script_convention("BaseTools/Tests/RunTests.sh"));
        assert!(!exempt_from_script_convention("foo.py"));
        assert!(!exempt_from_script_convention("foo.sh.bak"));
    }

    #[test]
    fn test_script_convention_by_directory() {
        assert!(exempt_from_script_convention(
            "BaseTools/BinWrappers/PosixLike/build"
        ));
        assert!(exempt_from_script_convention(
            "BaseTools/BinPipWrappers/PosixLike/GenFds"
        ));
        assert!(exempt_from_script_convention(
            "BaseTools/Bin/CYGWIN_NT-5.1-i686/armcc_wrapper"
        ));
        assert!(!exempt_from_script_convention(
            "BaseTools/BinWrappers/WindowsLike/build.bat"
        ));
    }

    #[test]
    fn test_build_env_exact_only() {
        assert!(exempt_from_script_convention("BaseTools/BuildEnv"));
        assert!(!exempt_from_script_convention("BaseTools/BuildEnvX"));
        assert!(!exempt_from_script_convention("Other/BaseTools/BuildEnv"));
    }

    #[test]
    fn test_git_internal_exact_only() {
        assert!(exempt_from_tab_and_crlf(".gitmodules"));
        assert!(exempt_from_tab_and_crlf("BaseTools/Conf/diff.order"));
        assert!(!exempt_from_tab_and_crlf("sub/.gitmodules"));
        assert!(!exempt_from_tab_and_crlf(".gitmodules.orig"));
    }

    #[test]
    fn test_sets_are_independent() {
        // neither
        assert!(!exempt_from_script_convention("MdePkg/Include/Base.h"));
        assert!(!exempt_from_tab_and_crlf("MdePkg/Include/Base.h"));
        // only one
        assert!(exempt_from_script_convention("edksetup.sh"));
        assert!(!exempt_from_tab_and_crlf("edksetup.sh"));
    }

    #[test]
    fn test_policy_for_source_file() {
        let rules = PathRules::builtin();
        assert_eq!(rules.policy_for("MdePkg/Library/Foo.c"), FilePolicy::default());
    }

    #[test]
    fn test_policy_for_script() {
        let policy = PathRules::builtin().policy_for("edksetup.sh");
        assert!(!policy.force_crlf);
        assert!(policy.force_notabs);
    }

    #[test]
    fn test_policy_for_git_internal() {
        let policy = PathRules::builtin().policy_for(".gitmodules");
        assert!(!policy.force_crlf);
        assert!(!policy.force_notabs);
    }

    #[test]
    fn test_policy_for_makefile() {
        let rules = PathRules::builtin();
        let policy = rules.policy_for("BaseTools/Source/C/GNUmakefile");
        assert!(policy.force_crlf);
        assert!(!policy.force_notabs);
        assert!(rules.tabs_allowed("Makefile"));
        assert!(!rules.tabs_allowed("Makefile.inc"));
    }

    #[test]
    fn test_configured_extras() {
        let config = PathsConfig {
            lf_only: vec!["scripts/*".to_string()],
            git_internal: vec![".gitattributes".to_string()],
            tabs_allowed: vec!["**/*.mk".to_string()],
        };
        let rules = PathRules::from_config(&config).unwrap();

        assert!(rules.exempt_from_script_convention("scripts/run"));
        assert!(!rules.exempt_from_script_convention("scripts/sub/run"));
        assert!(rules.exempt_from_tab_and_crlf(".gitattributes"));
        assert!(rules.tabs_allowed("Platform/rules.mk"));
        // built-ins still apply
        assert!(rules.exempt_from_script_convention("foo.sh"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = PathsConfig {
            lf_only: vec!["[".to_string()],
            ..PathsConfig::default()
        };
        let err = PathRules::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("paths.lf_only"));
    }
}
