// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Findings and per-patch outcomes.

use std::fmt;

/// Whether a finding fails the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Which part of a patch a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    CommitterEmail,
    AuthorEmail,
    Message,
    Diff,
}

impl Section {
    /// Short description used in one-line summaries.
    pub fn summary_name(&self) -> &'static str {
        match self {
            Section::CommitterEmail => "committer email",
            Section::AuthorEmail => "author email",
            Section::Message => "commit message",
            Section::Diff => "diff content",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::CommitterEmail => write!(f, "committer-email"),
            Section::AuthorEmail => write!(f, "author-email"),
            Section::Message => write!(f, "message"),
            Section::Diff => write!(f, "diff"),
        }
    }
}

/// Finding codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// A required trailer is absent.
    MissingTrailer,
    /// A trailer is misspelled or badly spaced.
    MalformedTrailer,
    /// An email address is malformed.
    InvalidEmail,
    /// Subject, body or signature block layout.
    MessageFormat,
    /// Tab character in a file that forbids them.
    DisallowedContent,
    /// Whitespace at the end of an added line.
    TrailingWhitespace,
    /// Deprecated debug print level.
    DeprecatedMacro,
    /// CRLF required but not present.
    LineEndingMismatch,
    /// The diff itself cannot be followed.
    PatchFormat,
}

impl FindingKind {
    /// Stable kebab-case code.
    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::MissingTrailer => "missing-trailer",
            FindingKind::MalformedTrailer => "malformed-trailer",
            FindingKind::InvalidEmail => "invalid-email",
            FindingKind::MessageFormat => "message-format",
            FindingKind::DisallowedContent => "disallowed-content",
            FindingKind::TrailingWhitespace => "trailing-whitespace",
            FindingKind::DeprecatedMacro => "deprecated-macro",
            FindingKind::LineEndingMismatch => "line-ending-mismatch",
            FindingKind::PatchFormat => "patch-format",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    /// Human-readable message.
    pub message: String,
    /// Extra lines such as the offending file and line.
    pub details: Vec<String>,
}

impl Finding {
    pub fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Append a detail line.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// All findings of one check on one patch.
#[derive(Debug, Clone)]
pub struct SectionOutcome {
    pub section: Section,
    /// Label shown in headings, e.g. `Author`.
    pub label: String,
    pub findings: Vec<Finding>,
}

impl SectionOutcome {
    pub fn new(section: Section, label: impl Into<String>) -> Self {
        Self {
            section,
            label: label.into(),
            findings: Vec::new(),
        }
    }

    /// Record a finding.
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Record an error finding with details.
    pub fn error(&mut self, kind: FindingKind, message: impl Into<String>, details: &[String]) {
        let mut finding = Finding::error(kind, message);
        finding.details.extend(details.iter().cloned());
        self.findings.push(finding);
    }

    /// Check whether the section passed (no errors).
    pub fn is_ok(&self) -> bool {
        !self.findings.iter().any(Finding::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }
}

/// Where a patch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOrigin {
    GitCommit,
    PatchFile,
}

impl fmt::Display for PatchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOrigin::GitCommit => write!(f, "git"),
            PatchOrigin::PatchFile => write!(f, "file"),
        }
    }
}

/// The result of checking one patch.
#[derive(Debug, Clone)]
pub struct PatchReport {
    /// Display name: a revision, a commit id, a file name or `stdin`.
    pub name: String,
    pub origin: PatchOrigin,
    /// Decoded subject, when the patch has a message.
    pub subject: Option<String>,
    pub sections: Vec<SectionOutcome>,
    /// Binary files added by the patch.
    pub new_binaries: Vec<String>,
}

impl PatchReport {
    pub fn new(name: impl Into<String>, origin: PatchOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
            subject: None,
            sections: Vec::new(),
            new_binaries: Vec::new(),
        }
    }

    /// Check if every section passed.
    pub fn is_ok(&self) -> bool {
        self.sections.iter().all(SectionOutcome::is_ok)
    }

    /// Get a section by kind.
    pub fn section(&self, section: Section) -> Option<&SectionOutcome> {
        self.sections.iter().find(|s| s.section == section)
    }

    /// Iterate over every finding of every section.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.sections.iter().flat_map(|s| s.findings.iter())
    }

    /// One-line summary, e.g. `bad commit message and diff content`.
    pub fn summary(&self) -> String {
        if self.is_ok() {
            return "ok".to_string();
        }

        let failed: Vec<&str> = self
            .sections
            .iter()
            .filter(|s| !s.is_ok())
            .map(|s| s.section.summary_name())
            .collect();

        format!("bad {}", failed.join(" and "))
    }
}

/// The result of a whole run over every argument.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub patches: Vec<PatchReport>,
    /// Revision specs that matched no commit.
    pub unresolved: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every patch passed and every argument resolved.
    pub fn is_ok(&self) -> bool {
        self.unresolved.is_empty() && self.patches.iter().all(PatchReport::is_ok)
    }

    /// Total number of error findings.
    pub fn error_count(&self) -> usize {
        self.patches
            .iter()
            .flat_map(|p| p.findings())
            .filter(|f| f.is_error())
            .count()
    }
}
