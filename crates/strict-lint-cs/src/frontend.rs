//! C# frontend using Tree-sitter.

use std::path::Path;

use strict_lint_core::{Frontend, FrontendError, ParsedUnit};
use tree_sitter::{Language, Parser};

use crate::lower::Lowerer;
use crate::symbols::FileResolver;

const LANGUAGE_ID: &str = "csharp";

/// File name suffixes of tool-generated C#, compared case-insensitively.
const GENERATED_SUFFIXES: &[&str] = &[".g.cs", ".g.i.cs", ".designer.cs", ".generated.cs"];

/// Header markers of tool-generated C#.
const GENERATED_MARKERS: &[&str] = &["<auto-generated", "<autogenerated"];

/// Parses C# source into the engine's syntax model.
pub struct CSharpFrontend {
    language: Language,
}

impl CSharpFrontend {
    /// Creates a new C# frontend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }
}

impl Default for CSharpFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontend for CSharpFrontend {
    fn language_id(&self) -> &'static str {
        LANGUAGE_ID
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["cs"]
    }

    fn is_generated(&self, path: &Path, source: &str) -> bool {
        let by_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|name| GENERATED_SUFFIXES.iter().any(|s| name.ends_with(s)));
        by_name || has_generated_header(source)
    }

    fn parse(&self, path: &Path, source: &str) -> Result<ParsedUnit, FrontendError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| FrontendError::Language {
                language: LANGUAGE_ID,
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| FrontendError::Parse {
                path: path.to_path_buf(),
                message: "parser returned no tree".to_string(),
            })?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::warn!(path = %path.display(), "C# source has syntax errors; analyzing recovered tree");
        }

        let (syntax, model) = Lowerer::new(path, source).lower(root);
        tracing::trace!(
            path = %path.display(),
            nodes = syntax.len(),
            classes = model.classes.len(),
            "lowered"
        );
        Ok(ParsedUnit::new(syntax, Box::new(FileResolver::new(model))))
    }
}

/// Checks the comments before the first line of code for a generator marker.
fn has_generated_header(source: &str) -> bool {
    let mut in_block = false;
    for line in source.trim_start_matches('\u{feff}').lines() {
        let line = line.trim();
        let comment = if in_block {
            in_block = !line.contains("*/");
            line
        } else if let Some(rest) = line.strip_prefix("//") {
            rest
        } else if let Some(rest) = line.strip_prefix("/*") {
            in_block = !rest.contains("*/");
            rest
        } else if line.is_empty() {
            continue;
        } else {
            return false;
        };
        let comment = comment.to_ascii_lowercase();
        if GENERATED_MARKERS.iter().any(|m| comment.contains(m)) {
            return true;
        }
    }
    false
}
