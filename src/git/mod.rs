// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git integration module.
//!
//! Revision specs are resolved with git2; each commit is then rendered
//! as an email patch for the checks.

pub mod commands;
mod repo;

pub use commands::show_patch;
pub use repo::Repository;
