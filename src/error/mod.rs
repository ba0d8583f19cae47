// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for patchcheck.
//!
//! Rule violations are never errors: they are collected as findings in
//! [`crate::report`]. The types here cover failures to obtain or decode
//! the input being checked.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for patchcheck operations.
#[derive(Error, Debug)]
pub enum PatchCheckError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    // Patch decoding errors
    #[error("Patch error: {0}")]
    Patch(#[from] PatchError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Git-related errors.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to open repository: {message}")]
    OpenFailed { message: String },

    #[error("Invalid commit reference: {reference}")]
    InvalidReference { reference: String },

    #[error("Git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::OpenFailed {
            message: err.message().to_string(),
        }
    }
}

/// Errors raised while splitting a patch into its pieces.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Malformed patch '{name}': {message}")]
    Malformed { name: String, message: String },
}

/// Result type alias for patchcheck operations.
pub type Result<T> = std::result::Result<T, PatchCheckError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PatchCheckError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
