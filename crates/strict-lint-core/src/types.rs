//! Core types for diagnostics and results.

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::descriptor::RuleDescriptor;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// File path as handed to the engine by the host.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix for a diagnostic, shown as help text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A diagnostic produced by a rule.
///
/// This is the engine's only output type. It carries the rule id, the
/// location of the offending construct, and the positional message
/// arguments the rule's template was filled with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "SR0001").
    pub code: String,
    /// Rule name (e.g., "get-component-outside-init").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Primary location of the diagnostic.
    pub location: Location,
    /// Human-readable message, already formatted.
    pub message: String,
    /// Positional arguments substituted into the message template.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Diagnostic {
    /// Creates a new diagnostic with an already formatted message.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            args: Vec::new(),
            suggestion: None,
        }
    }

    /// Creates a diagnostic from a descriptor, filling its message template.
    #[must_use]
    pub fn from_descriptor<S: AsRef<str>>(
        descriptor: &RuleDescriptor,
        location: Location,
        args: &[S],
    ) -> Self {
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
        let mut diagnostic = Self::new(
            descriptor.id,
            descriptor.name,
            descriptor.default_severity,
            location,
            descriptor.format_message(&args),
        );
        diagnostic.args = args;
        if !descriptor.help.is_empty() {
            diagnostic.suggestion = Some(Suggestion::new(descriptor.help));
        }
        diagnostic
    }

    /// Adds a suggestion to this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A diagnostic paired with its source text, for rich rendering via miette.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl DiagnosticReport {
    /// Builds a report for `diagnostic` over the full text of its file.
    #[must_use]
    pub fn new(diagnostic: &Diagnostic, source: String) -> Self {
        let name = diagnostic.location.file.display().to_string();
        let offset = diagnostic.location.offset.min(source.len());
        let length = diagnostic.location.length.min(source.len() - offset);
        Self {
            message: format!("[{}] {}", diagnostic.code, diagnostic.message),
            source_code: NamedSource::new(name, source),
            help: diagnostic.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((offset, length)),
            label_message: diagnostic.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics found.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of files skipped because they failed to read or parse.
    #[serde(default)]
    pub files_skipped: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any diagnostics meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Counts diagnostics by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.diagnostics.iter().filter(|d| d.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Sorts diagnostics by file, line, column, then code.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
                .then(a.code.cmp(&b.code))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic(severity: Severity, line: usize) -> Diagnostic {
        Diagnostic::new(
            "SR0001",
            "get-component-outside-init",
            severity,
            Location::new(PathBuf::from("Assets/Player.cs"), line, 9),
            "'GetComponent' is only allowed in Awake or Start. Found in 'Update'.",
        )
    }

    #[test]
    fn severity_orders_info_below_error() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("Warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn display_is_compact_one_liner() {
        let d = make_diagnostic(Severity::Warning, 12);
        let display = d.to_string();
        assert!(display.starts_with("Assets/Player.cs:12:9: warning [SR0001]"));
    }

    #[test]
    fn format_includes_help_line() {
        let d = make_diagnostic(Severity::Warning, 3)
            .with_suggestion(Suggestion::new("Cache the component in Awake"));
        insta::assert_snapshot!(d.format(), @r"
        SR0001 get-component-outside-init at Assets/Player.cs:3:9
          warning: 'GetComponent' is only allowed in Awake or Start. Found in 'Update'.
          = help: Cache the component in Awake
        ");
    }

    #[test]
    fn format_omits_help_when_none() {
        let formatted = make_diagnostic(Severity::Warning, 3).format();
        assert!(!formatted.contains("help:"));
    }

    #[test]
    fn threshold_checks_respect_ordering() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic(Severity::Warning, 1));
        assert!(!result.has_diagnostics_at(Severity::Error));
        assert!(result.has_diagnostics_at(Severity::Warning));
        assert!(result.has_diagnostics_at(Severity::Info));
    }

    #[test]
    fn sort_orders_by_line_within_file() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic(Severity::Warning, 30));
        result.diagnostics.push(make_diagnostic(Severity::Warning, 4));
        result.sort();
        assert_eq!(result.diagnostics[0].location.line, 4);
        assert_eq!(result.diagnostics[1].location.line, 30);
    }

    #[test]
    fn count_by_severity_splits_levels() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic(Severity::Warning, 1));
        result.diagnostics.push(make_diagnostic(Severity::Error, 2));
        result.diagnostics.push(make_diagnostic(Severity::Warning, 3));
        assert_eq!(result.count_by_severity(), (1, 2, 0));
    }

    #[test]
    fn report_clamps_span_to_source() {
        let d = make_diagnostic(Severity::Warning, 1);
        let d = Diagnostic {
            location: d.location.clone().with_span(4, 500),
            ..d
        };
        let report = DiagnosticReport::new(&d, "class A {}".to_string());
        let rendered = report.to_string();
        assert!(rendered.starts_with("[SR0001]"));
    }
}
