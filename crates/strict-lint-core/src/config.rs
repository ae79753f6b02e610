//! Configuration types for strict-lint.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scope::ScopeConfig;
use crate::types::Severity;

/// Top-level configuration, read from `strict-lint.toml`.
///
/// Rules are always on; there is no per-rule table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for a failing exit status (default: "warning").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Project-scope markers.
    #[serde(default)]
    pub scope: ScopeConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// The failure threshold, defaulting to warning.
    ///
    /// # Errors
    ///
    /// Returns an error if `fail_on` is not a severity name.
    pub fn fail_threshold(&self) -> Result<Severity, ConfigError> {
        match self.fail_on.as_deref() {
            None => Ok(Severity::Warning),
            Some(raw) => raw.parse().map_err(|message| ConfigError::Parse { message }),
        }
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of parallel file analyses.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_excludes(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Unity build output directories.
pub(crate) fn default_excludes() -> Vec<String> {
    vec![
        "**/Library/**".to_string(),
        "**/Temp/**".to_string(),
        "**/obj/**".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.analyzer.exclude.contains(&"**/Library/**".to_string()));
        assert_eq!(config.scope.project_root, "Assets");
        assert_eq!(config.fail_threshold().ok(), Some(Severity::Warning));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "error"

[analyzer]
root = "./Game"
exclude = ["**/Generated/**"]
parallelism = 2

[scope]
first_party_packages = ["com.example."]
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./Game"));
        assert_eq!(config.analyzer.exclude, vec!["**/Generated/**".to_string()]);
        assert_eq!(config.analyzer.parallelism, Some(2));
        assert_eq!(config.scope.first_party_packages, vec!["com.example.".to_string()]);
        assert_eq!(config.scope.vendor_cache, "PackageCache");
        assert_eq!(config.fail_threshold().ok(), Some(Severity::Error));
    }

    #[test]
    fn test_bad_threshold() {
        let config = Config::parse("fail_on = \"fatal\"").expect("Failed to parse");
        assert!(matches!(config.fail_threshold(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::parse("[analyzer").is_err());
    }
}
