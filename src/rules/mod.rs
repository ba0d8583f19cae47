// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule tables shared by the checks.
//!
//! Trailer prefixes and path exceptions are plain data so the rule set
//! stays auditable. Every function here is pure.

pub mod line_ending;
pub mod paths;
pub mod trailer;

pub use line_ending::{crlf_violation, split_keep_ends, Eol};
pub use paths::{exempt_from_script_convention, exempt_from_tab_and_crlf, FilePolicy, PathRules};
pub use trailer::{is_trailer_line, line_requires_validation, TRAILER_PREFIXES};
