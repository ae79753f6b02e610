//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::engine::Engine;
use crate::frontend::{Frontend, FrontendBox, FrontendError};
use crate::rule::{Rule, RuleBox};
use crate::scope::ScopeFilter;
use crate::types::{Diagnostic, LintResult};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A frontend failed to parse a file.
    #[error(transparent)]
    Frontend(#[from] FrontendError),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    frontends: Vec<FrontendBox>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    parallelism: Option<usize>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a language frontend.
    #[must_use]
    pub fn frontend<F: Frontend + 'static>(mut self, frontend: F) -> Self {
        self.frontends.push(Box::new(frontend));
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the number of worker threads (default: from config, else rayon's default).
    #[must_use]
    pub fn parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is unavailable or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p).map(|compiled| (p.clone(), compiled)))
            .collect::<Result<Vec<_>, _>>()?;

        let engine = Engine::with_scope(ScopeFilter::new(&config.scope)).rules(self.rules);

        Ok(Analyzer {
            root,
            frontends: self.frontends,
            engine,
            excludes,
            respect_gitignore: config.analyzer.respect_gitignore,
            parallelism: self.parallelism.or(config.analyzer.parallelism),
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    frontends: Vec<FrontendBox>,
    engine: Engine,
    excludes: Vec<(String, glob::Pattern)>,
    respect_gitignore: bool,
    parallelism: Option<usize>,
    fail_on_parse_error: bool,
}

enum FileOutcome {
    Checked(Vec<Diagnostic>),
    Skipped,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.engine.rule_count()
    }

    /// Analyzes all files and returns the results.
    ///
    /// Diagnostic paths are made relative to the root.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or
    /// a file fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let outcomes = self.run_parallel(&files);

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome? {
                FileOutcome::Checked(diagnostics) => {
                    result.diagnostics.extend(diagnostics);
                    result.files_checked += 1;
                }
                FileOutcome::Skipped => result.files_skipped += 1,
            }
        }

        for diagnostic in &mut result.diagnostics {
            if let Ok(relative) = diagnostic.location.file.strip_prefix(&self.root) {
                diagnostic.location.file = relative.to_path_buf();
            }
        }
        result.sort();

        info!(
            "Analysis complete: {} diagnostics in {} files ({} skipped)",
            result.diagnostics.len(),
            result.files_checked,
            result.files_skipped
        );

        Ok(result)
    }

    fn run_parallel(&self, files: &[PathBuf]) -> Vec<Result<FileOutcome, AnalyzerError>> {
        let run = || files.par_iter().map(|f| self.check_file(f)).collect();

        let Some(threads) = self.parallelism else {
            return run();
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                warn!("Falling back to the global thread pool: {}", e);
                run()
            }
        }
    }

    fn check_file(&self, path: &Path) -> Result<FileOutcome, AnalyzerError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!("Skipping non-UTF-8 file {}", path.display());
                return Ok(FileOutcome::Skipped);
            }
            Err(e) => return Err(e.into()),
        };

        if self.is_generated(path, &content) {
            return Ok(FileOutcome::Skipped);
        }

        match self.analyze_source(path, &content) {
            Ok(diagnostics) => Ok(FileOutcome::Checked(diagnostics)),
            Err(AnalyzerError::Frontend(e)) if !self.fail_on_parse_error => {
                warn!("{}", e);
                Ok(FileOutcome::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    /// Analyzes in-memory source as if it were read from `path`.
    ///
    /// Files no frontend handles produce no diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontend fails to parse the source.
    pub fn analyze_source(&self, path: &Path, source: &str) -> Result<Vec<Diagnostic>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let Some(frontend) = self.frontend_for(path) else {
            debug!("No frontend for {}", path.display());
            return Ok(Vec::new());
        };
        if self.is_generated(path, source) {
            return Ok(Vec::new());
        }

        let unit = frontend.parse(path, source)?;
        Ok(self.engine.analyze(&unit.tree, unit.resolver.as_ref()))
    }

    fn frontend_for(&self, path: &Path) -> Option<&FrontendBox> {
        self.frontends.iter().find(|f| f.handles(path))
    }

    fn is_generated(&self, path: &Path, source: &str) -> bool {
        let generated = self
            .frontend_for(path)
            .is_some_and(|f| f.is_generated(path, source));
        if generated {
            debug!("Skipping generated file {}", path.display());
        }
        generated
    }

    /// Discovers source files handled by a registered frontend.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if !self.root.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("root {} does not exist", self.root.display()),
            )
            .into());
        }

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if !path.is_file() || !self.frontends.iter().any(|f| f.handles(path)) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        let relative = path
            .strip_prefix(&self.root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        self.excludes.iter().any(|(raw, pattern)| {
            if pattern.matches(&path_str) || (!relative.is_empty() && pattern.matches(&relative)) {
                return true;
            }

            // Also check as substring for patterns like "**/Library/**"
            let normalized = raw.replace("**", "");
            !normalized.is_empty() && normalized != "/" && path_str.contains(&normalized)
        })
    }
}
