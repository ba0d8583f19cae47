// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Checking command-line arguments: patch files, stdin and git revisions.

use std::io::Read;
use std::path::Path;

use crate::config::PatchCheckConfig;
use crate::error::{GitError, PatchCheckError, Result, ResultExt};
use crate::git::{show_patch, Repository};
use crate::report::{
    Finding, FindingKind, PatchOrigin, PatchReport, RunReport, Section, SectionOutcome,
};
use crate::rules::PathRules;

use super::{check_patch, prepend_section, AddressCheck};

/// Runs the checks over every argument and collects a [`RunReport`].
pub struct Runner<'a> {
    config: &'a PatchCheckConfig,
    paths: &'a PathRules,
    max_count: Option<usize>,
    repo: Option<Repository>,
    report: RunReport,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a PatchCheckConfig, paths: &'a PathRules) -> Self {
        Self {
            config,
            paths,
            max_count: None,
            repo: None,
            report: RunReport::new(),
        }
    }

    /// Default commit count for git arguments without a `-N` prefix.
    pub fn with_max_count(mut self, max_count: Option<usize>) -> Self {
        self.max_count = max_count;
        self
    }

    /// Use an already opened repository for git arguments.
    pub fn with_repository(mut self, repo: Repository) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Check every argument.
    ///
    /// `-N` sets the commit count for the next argument; a trailing count
    /// applies to `HEAD`, as does an empty argument list.
    pub fn run<S: AsRef<str>>(mut self, args: &[S]) -> Result<RunReport> {
        if args.is_empty() {
            self.check_arg("HEAD", self.max_count)?;
            return Ok(self.report);
        }

        let mut count: Option<usize> = None;
        for arg in args {
            let arg = arg.as_ref();
            if let Some(n) = parse_count(arg) {
                count = Some(n);
                continue;
            }
            self.check_arg(arg, count.or(self.max_count))?;
            count = None;
        }

        if count.is_some() {
            self.check_arg("HEAD", count)?;
        }

        Ok(self.report)
    }

    /// Check one argument: `-` for stdin, a patch file, or a revision spec.
    pub fn check_arg(&mut self, arg: &str, max_count: Option<usize>) -> Result<()> {
        if arg == "-" {
            tracing::debug!("Checking patch from stdin");
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            self.check_text("stdin", &String::from_utf8_lossy(&buf))
        } else if Path::new(arg).is_file() {
            tracing::debug!("Checking patch file {}", arg);
            let bytes = std::fs::read(arg).context(format!("Failed to read {}", arg))?;
            self.check_text(arg, &String::from_utf8_lossy(&bytes))
        } else {
            self.check_git(arg, max_count)
        }
    }

    /// Check patch text; an unparseable patch fails that input only.
    fn check_text(&mut self, name: &str, text: &str) -> Result<()> {
        match check_patch(name, text, PatchOrigin::PatchFile, self.config, self.paths) {
            Ok(report) => self.report.patches.push(report),
            Err(PatchCheckError::Patch(e)) => {
                tracing::warn!("{}", e);
                let mut report = PatchReport::new(name, PatchOrigin::PatchFile);
                let mut outcome = SectionOutcome::new(Section::Message, "commit message");
                outcome.push(Finding::error(FindingKind::PatchFormat, e.to_string()));
                report.sections.push(outcome);
                self.report.patches.push(report);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn check_git(&mut self, spec: &str, max_count: Option<usize>) -> Result<()> {
        tracing::debug!("Resolving revision '{}' (max count {:?})", spec, max_count);
        if self.repo.is_none() {
            self.repo = Some(Repository::open_current()?);
        }
        let Some(repo) = self.repo.as_ref() else {
            return Err(GitError::NotARepository.into());
        };

        let commits = repo.resolve(spec, max_count)?;
        if commits.is_empty() {
            self.report.unresolved.push(spec.to_string());
            return Ok(());
        }

        let single = commits.len() == 1;
        let mut reports = Vec::with_capacity(commits.len());

        // oldest first
        for commit in commits.iter().rev() {
            let name = if single { spec } else { commit.as_str() };
            let committer = repo.committer(commit)?;
            let text = show_patch(repo, commit)?;

            let mut report =
                check_patch(name, &text, PatchOrigin::GitCommit, self.config, self.paths)?;
            prepend_section(
                &mut report,
                AddressCheck::run(Section::CommitterEmail, Some(&committer), "Committer"),
            );
            reports.push(report);
        }

        self.report.patches.extend(reports);
        Ok(())
    }
}

/// Parse a `-N` commit count argument.
fn parse_count(arg: &str) -> Option<usize> {
    let digits = arg.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
