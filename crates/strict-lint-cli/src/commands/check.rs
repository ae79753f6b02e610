//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use strict_lint_core::{Analyzer, Config, LintResult, Severity};
use strict_lint_cs::CSharpFrontend;
use strict_lint_rules::Preset;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of the check command.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Threshold from the command line; wins over the config file.
    pub fail_on: Option<Severity>,
    /// Rule group.
    pub preset: Preset,
}

/// Runs the check command. Returns true if the run should fail.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;
    let threshold = match options.fail_on {
        Some(severity) => severity,
        None => config.fail_threshold().context("Invalid `fail_on` in config")?,
    };

    let analyzer = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(options.exclude.iter().cloned())
        .frontend(CSharpFrontend::new())
        .rules(options.preset.rules())
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        path.display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    Ok(fails(&result, threshold))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Returns true if any diagnostic is at or above `threshold`.
fn fails(result: &LintResult, threshold: Severity) -> bool {
    result.has_diagnostics_at(threshold)
}
