// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit message trailer recognition.

/// Line prefixes that mark a commit message trailer.
///
/// Matching is case-sensitive against the raw start of the line.
/// `Reviewed-by` intentionally carries no colon.
pub const TRAILER_PREFIXES: &[&str] = &[
    "git-svn-id:",
    "Reviewed-by",
    "Acked-by:",
    "Tested-by:",
    "Reported-by:",
    "Suggested-by:",
    "Signed-off-by:",
    "Cc:",
];

/// Check whether a line is a recognized trailer.
pub fn is_trailer_line(line: &str) -> bool {
    TRAILER_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// Check whether `lines[index]` is subject to content rules.
///
/// Trailer lines are exempt. An index past the end has nothing to
/// validate.
pub fn line_requires_validation<S: AsRef<str>>(lines: &[S], index: usize) -> bool {
    match lines.get(index) {
        Some(line) => !is_trailer_line(line.as_ref()),
        None => false,
    }
}
