// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for patchcheck.
//!
//! Handles discovery, parsing and defaults of patchcheck.toml. The
//! configuration is loaded once at start-up and read-only afterwards.

mod loader;
mod schema;

pub use loader::{find_config_file, find_config_file_from, load_config, parse_config};
pub use schema::*;
