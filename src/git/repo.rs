// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Repository operations.

use crate::error::{GitError, PatchCheckError, Result};
use git2::{Oid, Repository as Git2Repo, RevparseMode, Sort};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with the lookups the checker needs.
pub struct Repository {
    inner: Git2Repo,
    workdir: PathBuf,
}

impl Repository {
    /// Open a repository from the current directory.
    pub fn open_current() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            PatchCheckError::Git(GitError::OpenFailed {
                message: format!("Failed to get current directory: {}", e),
            })
        })?;
        Self::open(&current_dir)
    }

    /// Open a repository from a path.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                PatchCheckError::Git(GitError::NotARepository)
            } else {
                PatchCheckError::Git(GitError::OpenFailed {
                    message: e.message().to_string(),
                })
            }
        })?;

        // `git show` runs from here; a bare repository is its own directory.
        let workdir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self {
            inner: repo,
            workdir,
        })
    }

    /// Directory git commands should run in.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Get a commit by reference (SHA, branch name, etc.).
    pub fn get_commit(&self, reference: &str) -> Result<git2::Commit<'_>> {
        let obj = self.inner.revparse_single(reference).map_err(|e| {
            PatchCheckError::Git(GitError::InvalidReference {
                reference: format!("{}: {}", reference, e.message()),
            })
        })?;

        let commit = obj.peel_to_commit().map_err(|e| {
            PatchCheckError::Git(GitError::InvalidReference {
                reference: format!("{}: {}", reference, e.message()),
            })
        })?;

        Ok(commit)
    }

    /// Resolve a revision spec to abbreviated commit ids, newest first.
    ///
    /// `A..B` and `A...B` walk the range; a single revision walks back up
    /// to `max_count` commits, or yields just that commit when no count
    /// is given. A spec git cannot parse resolves to nothing.
    pub fn resolve(&self, spec: &str, max_count: Option<usize>) -> Result<Vec<String>> {
        let revspec = match self.inner.revparse(spec) {
            Ok(revspec) => revspec,
            Err(e) => {
                tracing::debug!("Cannot resolve '{}': {}", spec, e.message());
                return Ok(Vec::new());
            }
        };

        let mode = revspec.mode();
        let is_range = mode.contains(RevparseMode::RANGE) || mode.contains(RevparseMode::MERGE_BASE);

        let oids: Vec<Oid> = if is_range {
            let mut revwalk = self.inner.revwalk().map_err(|e| walk_error("revwalk", e))?;
            revwalk
                .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
                .map_err(|e| walk_error("revwalk.sort", e))?;

            let from = revspec.from().map(|o| o.id());
            let to = revspec.to().map(|o| o.id());
            if let Some(to) = to {
                revwalk.push(to).map_err(|e| walk_error("revwalk.push", e))?;
            }

            if mode.contains(RevparseMode::MERGE_BASE) {
                // symmetric difference: both sides, minus their merge base
                if let Some(from) = from {
                    revwalk.push(from).map_err(|e| walk_error("revwalk.push", e))?;
                    if let Some(to) = to {
                        if let Ok(base) = self.inner.merge_base(from, to) {
                            revwalk.hide(base).map_err(|e| walk_error("revwalk.hide", e))?;
                        }
                    }
                }
            } else if let Some(from) = from {
                revwalk.hide(from).map_err(|e| walk_error("revwalk.hide", e))?;
            }

            let limit = max_count.unwrap_or(usize::MAX);
            revwalk
                .take(limit)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| walk_error("revwalk", e))?
        } else {
            let start = match revspec.from().map(|o| o.peel_to_commit()) {
                Some(Ok(commit)) => commit.id(),
                _ => {
                    tracing::debug!("'{}' does not name a commit", spec);
                    return Ok(Vec::new());
                }
            };

            match max_count {
                None => vec![start],
                Some(limit) => {
                    let mut revwalk =
                        self.inner.revwalk().map_err(|e| walk_error("revwalk", e))?;
                    revwalk
                        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
                        .map_err(|e| walk_error("revwalk.sort", e))?;
                    revwalk
                        .push(start)
                        .map_err(|e| walk_error("revwalk.push", e))?;
                    revwalk
                        .take(limit)
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(|e| walk_error("revwalk", e))?
                }
            }
        };

        let ids = oids
            .into_iter()
            .map(|oid| self.short_id(oid))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Resolved '{}' to {} commit(s)", spec, ids.len());
        Ok(ids)
    }

    /// The committer identity of a commit as `Name <email>`.
    pub fn committer(&self, reference: &str) -> Result<String> {
        let commit = self.get_commit(reference)?;
        let committer = commit.committer();
        Ok(format!(
            "{} <{}>",
            String::from_utf8_lossy(committer.name_bytes()),
            String::from_utf8_lossy(committer.email_bytes())
        ))
    }

    fn short_id(&self, oid: Oid) -> Result<String> {
        let object = self
            .inner
            .find_object(oid, None)
            .map_err(|e| PatchCheckError::Git(GitError::from(e)))?;
        let buf = object
            .short_id()
            .map_err(|e| PatchCheckError::Git(GitError::from(e)))?;
        Ok(buf.as_str().map_or_else(|| oid.to_string(), str::to_string))
    }
}

fn walk_error(command: &str, e: git2::Error) -> PatchCheckError {
    PatchCheckError::Git(GitError::CommandFailed {
        command: command.to_string(),
        message: e.message().to_string(),
    })
}
