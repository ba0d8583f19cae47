// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git diff content check.
//!
//! Walks a unified git diff line by line. Each `diff --git` header
//! selects the [`FilePolicy`] for that file; every added line is then
//! checked for line endings, tabs, trailing whitespace and deprecated
//! debug macros.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::DiffConfig;
use crate::report::{Finding, FindingKind, Section, SectionOutcome};
use crate::rules::{crlf_violation, split_keep_ends, Eol, FilePolicy, PathRules};

/// Lines allowed between a `diff --git` header and the first hunk.
const PRE_PATCH_PREFIXES: &[&str] = &[
    "--- ",
    "+++ ",
    "index ",
    "new file ",
    "deleted file ",
    "old mode ",
    "new mode ",
    "similarity index ",
    "copy from ",
    "copy to ",
    "rename ",
];

const DIFF_HEADER: &str = "diff --git";
const DIFF_PATH_PREFIX: &str = "diff --git a/";
const NO_NEWLINE: &str = "\\ No newline ";

lazy_static! {
    static ref NEW_FILE_INDEX_RE: Regex = Regex::new(r"^index 0+\.\.").unwrap();

    static ref OLD_DEBUG_RE: Regex = Regex::new(
        r"DEBUG\s*\(\s*\(\s*(?:DEBUG_[A-Z_]+\s*\|\s*)*EFI_D_([A-Z_]+)"
    ).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a `diff --git` header.
    Start,
    /// Between a header and the first hunk.
    PrePatch,
    /// Inside hunks.
    Patch,
}

/// Per-file state of the walk.
#[derive(Debug, Clone)]
struct CurrentFile {
    path: String,
    policy: FilePolicy,
    is_new: bool,
    binary: bool,
}

/// Result of a diff check.
#[derive(Debug, Clone)]
pub struct DiffOutcome {
    pub outcome: SectionOutcome,
    /// Binary files added by the diff.
    pub new_binaries: Vec<String>,
}

/// Git diff checker.
pub struct DiffCheck<'a> {
    config: &'a DiffConfig,
    paths: &'a PathRules,
    lines: Vec<&'a str>,
    line_num: usize,
    state: State,
    file: Option<CurrentFile>,
    format_ok: bool,
    outcome: SectionOutcome,
    new_binaries: Vec<String>,
}

impl<'a> DiffCheck<'a> {
    /// Check every added line of `diff`.
    pub fn run(diff: &'a str, config: &'a DiffConfig, paths: &'a PathRules) -> DiffOutcome {
        let mut check = Self {
            config,
            paths,
            lines: split_keep_ends(diff),
            line_num: 0,
            state: State::Start,
            file: None,
            format_ok: true,
            outcome: SectionOutcome::new(Section::Diff, "diff"),
            new_binaries: Vec::new(),
        };

        while check.line_num < check.lines.len() && check.format_ok {
            let before = check.line_num;
            check.step();
            debug_assert!(check.line_num > before);
        }

        DiffOutcome {
            outcome: check.outcome,
            new_binaries: check.new_binaries,
        }
    }

    fn is_binary(&self) -> bool {
        self.file.as_ref().is_some_and(|f| f.binary)
    }

    fn step(&mut self) {
        let line = self.lines[self.line_num];

        if matches!(self.state, State::PrePatch | State::Patch) && line.starts_with(DIFF_HEADER)
        {
            self.state = State::Start;
        }

        if self.state == State::Patch {
            if line.starts_with("@@ ") {
                self.state = State::PrePatch;
            } else if !line.is_empty()
                && !line.starts_with([' ', '-', '+'])
                && !line.starts_with("\r\n")
                && !line.starts_with(NO_NEWLINE)
                && !self.is_binary()
            {
                self.end_of_patch();
                return;
            }
        }

        match self.state {
            State::Start => self.start_line(line),
            State::PrePatch => self.pre_patch_line(line),
            State::Patch => self.patch_line(line),
        }
        self.line_num += 1;
    }

    /// Anything after the last hunk (e.g. a mail signature) ends the walk,
    /// but a further file diff there means the patch is mangled.
    fn end_of_patch(&mut self) {
        let trailing_diff = self.lines[self.line_num + 1..]
            .iter()
            .any(|l| l.starts_with(DIFF_HEADER));
        if trailing_diff {
            self.format_error("diff found after end of patch");
        }
        tracing::debug!("End of patch at line {}", self.line_num + 1);
        self.line_num = self.lines.len();
    }

    fn start_line(&mut self, line: &str) {
        if line.starts_with(DIFF_HEADER) {
            let path = line
                .strip_prefix(DIFF_PATH_PREFIX)
                .unwrap_or("")
                .split(' ')
                .next()
                .unwrap_or("")
                .to_string();
            tracing::debug!("Checking diff of {}", path);

            self.file = Some(CurrentFile {
                policy: self.paths.policy_for(&path),
                path,
                is_new: false,
                binary: false,
            });
            self.state = State::PrePatch;
        } else if !line.trim_end().is_empty() {
            self.format_error("didn't find diff command");
        }
    }

    fn pre_patch_line(&mut self, line: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        if line.starts_with("@@ ") {
            self.state = State::Patch;
            file.binary = false;
        } else if line.starts_with("GIT binary patch") || line.starts_with("Binary files") {
            self.state = State::Patch;
            file.binary = true;
            if file.is_new {
                self.new_binaries.push(file.path.clone());
            }
        } else if line.starts_with("new file mode 160000") {
            // new submodule
            file.policy.force_crlf = false;
        } else {
            file.is_new = NEW_FILE_INDEX_RE.is_match(line);
            if !PRE_PATCH_PREFIXES.iter().any(|p| line.starts_with(p)) {
                self.format_error("didn't find diff hunk marker (@@)");
            }
        }
    }

    fn patch_line(&mut self, line: &str) {
        if self.is_binary() {
            return;
        }

        if let Some(added) = line.strip_prefix('+') {
            self.check_added_line(added);
        } else if line.starts_with('-')
            || line.starts_with(' ')
            || line.starts_with("\r\n")
            || line.starts_with(NO_NEWLINE)
        {
            // removed, context, mangled empty context, or no-newline marker
        } else {
            self.format_error("unexpected patch line");
        }
    }

    fn check_added_line(&mut self, raw: &str) {
        let Some(file) = self.file.as_ref() else {
            return;
        };
        let (line, eol) = Eol::split(raw);
        let policy = file.policy;
        let details = [format!("File: {}", file.path), format!("Line: {}", line)];

        if crlf_violation(eol, policy.force_crlf, line) {
            self.outcome.error(
                FindingKind::LineEndingMismatch,
                format!("Line ending ({}) is not CRLF", eol),
                &details,
            );
        }

        if policy.force_notabs && line.contains('\t') {
            self.outcome
                .error(FindingKind::DisallowedContent, "Tab character used", &details);
        }

        if self.config.check_trailing_whitespace && line.trim_end().len() < line.len() {
            self.outcome.error(
                FindingKind::TrailingWhitespace,
                "Trailing whitespace found",
                &details,
            );
        }

        if self.config.check_debug_macros {
            if let Some(caps) = OLD_DEBUG_RE.captures(line) {
                let level = &caps[1];
                self.outcome.error(
                    FindingKind::DeprecatedMacro,
                    format!(
                        "EFI_D_{} was used, but DEBUG_{} is now recommended",
                        level, level
                    ),
                    &details,
                );
            }
        }
    }

    fn format_error(&mut self, message: &str) {
        self.format_ok = false;
        let line = self.lines[self.line_num].trim_end();
        self.outcome.push(
            Finding::error(
                FindingKind::PatchFormat,
                format!("Patch format error: {}", message),
            )
            .with_detail(format!("Line: {}", line)),
        );
    }
}
