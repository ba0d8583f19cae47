// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Findings and report rendering.
//!
//! Checks collect every finding first; rendering happens once the whole
//! run is complete.

mod finding;
mod render;

pub use finding::{
    Finding, FindingKind, PatchOrigin, PatchReport, RunReport, Section, SectionOutcome, Severity,
};
pub use render::{OutputFormat, Renderer, MESSAGE_FORMAT_URL};
