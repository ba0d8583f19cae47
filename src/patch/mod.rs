// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Patch parsing.
//!
//! Turns the text of a `git format-patch` email (or a bare git diff) into
//! the pieces the checks consume.

mod mail;
mod pieces;

pub use mail::{decode_header, MailMessage};
pub use pieces::{clean_subject, PatchPieces};
