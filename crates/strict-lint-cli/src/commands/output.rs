//! Shared output formatting for lint results.

use anyhow::{Context, Result};
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::path::Path;
use strict_lint_core::{DiagnosticReport, LintResult, Severity};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is where relative diagnostic paths are resolved for `rich` output.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print!("{}", render_compact(result)),
        OutputFormat::Rich => print!("{}", render_rich(result, root)?),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for diagnostic in &result.diagnostics {
        let severity_indicator = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            diagnostic.code,
            diagnostic.rule,
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column,
        );
        println!("  {}: {}", severity_indicator, diagnostic.message);
        if let Some(suggestion) = &diagnostic.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn render_compact(result: &LintResult) -> String {
    result
        .diagnostics
        .iter()
        .map(|d| format!("{d}\n"))
        .collect()
}

fn render_rich(result: &LintResult, root: &Path) -> Result<String> {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();

    for diagnostic in &result.diagnostics {
        let file = root.join(&diagnostic.location.file);
        let source = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let report = DiagnosticReport::new(diagnostic, source);
        handler
            .render_report(&mut out, &report)
            .context("Failed to render report")?;
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use strict_lint_core::{Diagnostic, Location, Suggestion};

    fn sample() -> LintResult {
        let mut result = LintResult::new();
        result.diagnostics.push(Diagnostic::new(
            "SR0002",
            "forbidden-find-method",
            Severity::Warning,
            Location::new(PathBuf::from("Assets/Spawner.cs"), 2, 42).with_span(60, 22),
            "'GameObject.Find' is forbidden. Use DI (VContainer) or SerializeField instead.",
        ));
        result.diagnostics.push(
            Diagnostic::new(
                "SR0003",
                "null-guard",
                Severity::Warning,
                Location::new(PathBuf::from("Assets/Player.cs"), 7, 13),
                "Null check after GetComponent violates Fail-Fast principle. Use [RequireComponent] and access directly.",
            )
            .with_suggestion(Suggestion::new("add [RequireComponent]")),
        );
        result.files_checked = 2;
        result
    }

    #[test]
    fn compact_is_one_line_per_diagnostic() {
        insta::assert_snapshot!(render_compact(&sample()), @r"
        Assets/Spawner.cs:2:42: warning [SR0002] 'GameObject.Find' is forbidden. Use DI (VContainer) or SerializeField instead.
        Assets/Player.cs:7:13: warning [SR0003] Null check after GetComponent violates Fail-Fast principle. Use [RequireComponent] and access directly.
        ");
    }

    #[test]
    fn compact_of_clean_run_is_empty() {
        assert_eq!(render_compact(&LintResult::new()), "");
    }

    #[test]
    fn json_round_trips_through_serde() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: LintResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.diagnostics, sample().diagnostics);
        assert_eq!(back.files_checked, 2);
    }

    #[test]
    fn rich_output_labels_the_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("Assets")).unwrap();
        let source = "using UnityEngine;\nclass Spawner : MonoBehaviour { void Update() { GameObject.Find(\"A\"); } }\n";
        std::fs::write(tmp.path().join("Assets/Spawner.cs"), source).unwrap();

        let mut result = sample();
        result.diagnostics.truncate(1);
        let offset = source.find("GameObject.Find").unwrap();
        result.diagnostics[0].location = Location::new(PathBuf::from("Assets/Spawner.cs"), 2, 49)
            .with_span(offset, "GameObject.Find(\"A\")".len());

        let rendered = render_rich(&result, tmp.path()).unwrap();
        assert!(rendered.contains("[SR0002]"));
        assert!(rendered.contains("Assets/Spawner.cs"));
        assert!(rendered.contains("forbidden-find-method"));
    }

    #[test]
    fn rich_output_needs_the_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(render_rich(&sample(), tmp.path()).is_err());
    }
}
