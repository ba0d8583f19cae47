// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git command wrappers.
//!
//! git2 has no email-format renderer, so patches come from `git show`.

use crate::error::{GitError, PatchCheckError, Result};
use std::process::Command;

use super::repo::Repository;

/// Render a commit as an email-format patch.
pub fn show_patch(repo: &Repository, commit: &str) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.current_dir(repo.workdir());
    cmd.args([
        "show",
        "--pretty=email",
        "--no-textconv",
        "--no-use-mailmap",
        "--no-color",
        commit,
    ]);

    tracing::debug!("Running git show for {}", commit);

    let output = cmd.output().map_err(|e| {
        PatchCheckError::Git(GitError::CommandFailed {
            command: "git show".to_string(),
            message: format!("Failed to run git: {}", e),
        })
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PatchCheckError::Git(GitError::CommandFailed {
            command: format!("git show {}", commit),
            message: stderr.trim().to_string(),
        }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
