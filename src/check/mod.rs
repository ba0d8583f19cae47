// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Patch checks.
//!
//! Each check produces a [`SectionOutcome`]; [`check_patch`] combines
//! them into a [`PatchReport`] for one patch, and [`Runner`] does so for
//! every command-line argument.

mod address;
mod diff;
mod message;
mod runner;

pub use address::{address_problems, AddressCheck};
pub use diff::{DiffCheck, DiffOutcome};
pub use message::{MessageCheck, Signature};
pub use runner::Runner;

use crate::config::PatchCheckConfig;
use crate::error::Result;
use crate::patch::PatchPieces;
use crate::report::{PatchOrigin, PatchReport, Section, SectionOutcome};
use crate::rules::PathRules;

/// Check the text of one patch.
///
/// The author and message checks run when the patch carries a message,
/// the diff check when it carries a diff.
pub fn check_patch(
    name: &str,
    text: &str,
    origin: PatchOrigin,
    config: &PatchCheckConfig,
    paths: &PathRules,
) -> Result<PatchReport> {
    let pieces = PatchPieces::split(name, text)?;
    let mut report = PatchReport::new(name, origin);
    report.subject = pieces.subject.clone();

    if pieces.message.is_some() {
        report.sections.push(AddressCheck::run(
            Section::AuthorEmail,
            pieces.author.as_deref(),
            "Author",
        ));
        report.sections.push(MessageCheck::run(
            pieces.subject.as_deref(),
            pieces.message.as_deref(),
            pieces.author.as_deref(),
            &config.message,
        ));
    }

    if let Some(ref diff) = pieces.diff {
        let result = DiffCheck::run(diff, &config.diff, paths);
        report.sections.push(result.outcome);
        report.new_binaries = result.new_binaries;
    }

    tracing::debug!("{}: {}", name, report.summary());
    Ok(report)
}

/// Prepend a section, keeping identity checks ahead of content checks.
pub(crate) fn prepend_section(report: &mut PatchReport, outcome: SectionOutcome) {
    report.sections.insert(0, outcome);
}
