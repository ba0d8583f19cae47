// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit message check: trailers, subject and body layout.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::MessageConfig;
use crate::report::{Finding, FindingKind, Section, SectionOutcome};
use crate::rules::{line_requires_validation, split_keep_ends, Eol};

use super::address::address_problems;

const SIGNED_OFF_BY: &str = "Signed-off-by";
const MERGIFY_AUTHOR: &str = "mergify[bot]@users.noreply.github.com";

/// Trailer types whose spelling, spacing and address are validated,
/// in reporting order.
const SIGNATURE_TYPES: &[&str] = &[
    SIGNED_OFF_BY,
    "Reviewed-by",
    "Reported-by",
    "Tested-by",
    "Suggested-by",
    "Acked-by",
    "Cc",
];

/// The obsolete contribution agreement line, matched exactly.
const CONTRIBUTED_UNDER: &str = "Contributed-under: TianoCore Contribution Agreement 1.1";

lazy_static! {
    static ref SIGNATURE_RES: Vec<(&'static str, Regex)> = SIGNATURE_TYPES
        .iter()
        .map(|sig| (*sig, signature_regex(sig)))
        .collect();

    /// A signature block line: `Tag: value` or `[updater: note]`.
    static ref SIG_BLOCK_RE: Regex =
        Regex::new(r"^(?:[^:]+:\s*\S.*|\[[^:]+:\s*.+?\s*\]\s*)$").unwrap();

    static ref CVE_RE: Regex = Regex::new(r"CVE-[0-9]{4}-[0-9]{5}[^0-9]").unwrap();
}

/// Build the matcher for one trailer tag.
///
/// Case-insensitive, and each `-` in the tag also accepts whitespace so
/// that misspellings are caught and reported.
fn signature_regex(tag: &str) -> Regex {
    let pattern = regex::escape(tag).replace(r"\-", "-").replace('-', r"[-\s]+");
    Regex::new(&format!(
        r"(?mi)^(?P<tag>{})(\s*):(\s*)(?P<value>\S.*?)(?:\s*#.*)?\s*$",
        pattern
    ))
    .unwrap()
}

/// One trailer occurrence found in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub tag: String,
    pub value: String,
}

/// Commit message check.
#[derive(Debug, Clone)]
pub struct MessageCheck<'a> {
    config: &'a MessageConfig,
    outcome: SectionOutcome,
}

impl<'a> MessageCheck<'a> {
    /// Check a subject and message body written by `author`.
    pub fn run(
        subject: Option<&str>,
        message: Option<&str>,
        author: Option<&str>,
        config: &'a MessageConfig,
    ) -> SectionOutcome {
        let mut check = Self {
            config,
            outcome: SectionOutcome::new(Section::Message, "commit message"),
        };

        if subject.is_none() && message.is_none() {
            check.error(FindingKind::MessageFormat, "Commit message is missing!");
            return check.outcome;
        }

        let subject = subject.unwrap_or("");
        let message = message.unwrap_or("");

        let mergify_merge = author.is_some_and(|a| a.contains(MERGIFY_AUTHOR))
            && subject.contains("Merge branch");
        if mergify_merge {
            tracing::debug!("Mergify merge commit, skipping Signed-off-by checks");
        }

        check.check_contributed_under(message);
        check.check_signatures(message, mergify_merge);
        check.check_overall_format(subject, message);

        check.outcome
    }

    fn error(&mut self, kind: FindingKind, message: impl Into<String>) {
        self.outcome.push(Finding::error(kind, message));
    }

    fn check_contributed_under(&mut self, message: &str) {
        if message.contains(CONTRIBUTED_UNDER) {
            self.error(
                FindingKind::MalformedTrailer,
                "Contributed-under! (Note: this must be removed by the code contributor!)",
            );
        }
    }

    fn check_signatures(&mut self, message: &str, mergify_merge: bool) {
        for (sig, regex) in SIGNATURE_RES.iter() {
            if *sig == SIGNED_OFF_BY {
                if mergify_merge {
                    continue;
                }
                if !message.contains(SIGNED_OFF_BY) {
                    if self.config.require_signed_off_by {
                        self.error(
                            FindingKind::MissingTrailer,
                            "Missing Signed-off-by! (Note: this must be preceded by a blank line)",
                        );
                    }
                    continue;
                }
                let found = self.find_signatures(sig, regex, message);
                if found.is_empty() && self.config.require_signed_off_by {
                    self.error(FindingKind::MalformedTrailer, "Invalid Signed-off-by format!");
                }
            } else {
                self.find_signatures(sig, regex, message);
            }
        }
    }

    /// Find and validate every occurrence of `sig`.
    fn find_signatures(&mut self, sig: &str, regex: &Regex, message: &str) -> Vec<Signature> {
        let mut found = Vec::new();

        for caps in regex.captures_iter(message) {
            let tag = caps.name("tag").map_or("", |m| m.as_str());
            let before_colon = caps.get(2).map_or("", |m| m.as_str());
            let after_colon = caps.get(3).map_or("", |m| m.as_str());
            let value = caps.name("value").map_or("", |m| m.as_str());

            if tag != sig {
                self.error(
                    FindingKind::MalformedTrailer,
                    format!("'{}' should be '{}'", tag, sig),
                );
            }
            if !before_colon.is_empty() {
                self.error(
                    FindingKind::MalformedTrailer,
                    format!("There should be no spaces between {} and the ':'", sig),
                );
            }
            if after_colon != " " {
                self.error(
                    FindingKind::MalformedTrailer,
                    format!("There should be a space after '{}:'", sig),
                );
            }
            for problem in address_problems(value) {
                self.error(
                    FindingKind::InvalidEmail,
                    format!("The '{}' email address is not valid: {}", sig, problem),
                );
            }

            found.push(Signature {
                tag: tag.to_string(),
                value: value.to_string(),
            });
        }

        found
    }

    fn check_overall_format(&mut self, subject: &str, message: &str) {
        let mut lines: Vec<&str> = vec![subject, ""];
        lines.extend(split_keep_ends(message).into_iter().map(|l| Eol::split(l).0));

        let subject_len = subject.trim_end().chars().count();
        let max_subject = if CVE_RE.is_match(&format!("{}\n", subject)) {
            self.config.max_cve_subject_length
        } else {
            self.config.max_subject_length
        };
        if subject_len > max_subject {
            self.error(
                FindingKind::MessageFormat,
                format!(
                    "First line of commit message (subject line) is too long ({} >= {}).",
                    subject_len,
                    max_subject + 1
                ),
            );
        }

        if subject.trim().is_empty() {
            self.error(
                FindingKind::MessageFormat,
                "First line of commit message (subject line) is empty.",
            );
        }

        let max_body = self.config.max_body_line_length;
        for i in 2..lines.len() {
            let line = lines[i];
            let len = line.chars().count();
            if len > max_body
                && line.split_whitespace().count() > 1
                && line_requires_validation(&lines, i)
            {
                self.outcome.push(
                    Finding::error(
                        FindingKind::MessageFormat,
                        format!(
                            "Line {} of commit message is too long ({} >= {}).",
                            i + 1,
                            len,
                            max_body + 1
                        ),
                    )
                    .with_detail(line),
                );
            }
        }

        self.check_signature_block(&lines);
    }

    /// The trailers at the end must be separated from the body by a blank
    /// line.
    fn check_signature_block(&mut self, lines: &[&str]) {
        let mut last_sig_line: Option<&str> = None;

        for i in (1..lines.len()).rev() {
            let line = lines[i];
            if SIG_BLOCK_RE.is_match(line) {
                last_sig_line = Some(line.trim());
                continue;
            }

            if line.trim().is_empty() {
                break;
            }

            match last_sig_line {
                Some(sig_line) => self.outcome.push(
                    Finding::error(
                        FindingKind::MessageFormat,
                        "The line before the signature block should be empty",
                    )
                    .with_detail(format!("Add empty line before \"{}\"?", sig_line)),
                ),
                None => self.error(
                    FindingKind::MessageFormat,
                    "The signature block was not found",
                ),
            }
            break;
        }
    }
}
