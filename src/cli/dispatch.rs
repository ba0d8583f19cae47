// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command execution.

use crate::check::Runner;
use crate::config::PatchCheckConfig;
use crate::error::Result;
use crate::report::Renderer;
use crate::rules::PathRules;

use super::args::Cli;

/// Run the checks requested by `cli` and print the report.
///
/// Returns whether every patch passed.
pub fn run(cli: Cli) -> Result<bool> {
    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        PatchCheckConfig::load_from(config_path)?
    } else {
        PatchCheckConfig::load()?
    };

    let paths = PathRules::from_config(&config.paths)?;

    tracing::debug!("Checking {} argument(s)", cli.patches.len());

    let report = Runner::new(&config, &paths)
        .with_max_count(cli.max_count)
        .run(&cli.patches)?;

    let verbosity = cli.verbosity().unwrap_or(config.output.verbosity);
    let color = config.output.color && console::colors_enabled();
    console::set_colors_enabled(color);

    Renderer::new(verbosity, cli.output_format(), color).print(&report)?;

    tracing::debug!(
        "{} patch(es), {} error(s), {} unresolved",
        report.patches.len(),
        report.error_count(),
        report.unresolved.len()
    );

    Ok(report.is_ok())
}
