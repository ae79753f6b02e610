//! Language frontend seam.
//!
//! A frontend turns one source file into the engine's syntax model plus a
//! resolver that answers semantic questions about it.

use std::path::{Path, PathBuf};

use crate::symbols::SymbolResolver;
use crate::syntax::SyntaxTree;

/// A parsed source file ready for the engine.
pub struct ParsedUnit {
    /// Lowered syntax tree.
    pub tree: SyntaxTree,
    /// Resolver over `tree`.
    pub resolver: Box<dyn SymbolResolver>,
}

impl ParsedUnit {
    /// Creates a parsed unit.
    #[must_use]
    pub fn new(tree: SyntaxTree, resolver: Box<dyn SymbolResolver>) -> Self {
        Self { tree, resolver }
    }
}

/// Errors a frontend can report.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    /// The parser grammar could not be loaded.
    #[error("Failed to load {language} grammar: {message}")]
    Language {
        /// Language id.
        language: &'static str,
        /// Loader message.
        message: String,
    },

    /// The file could not be parsed at all.
    #[error("Parse error in {}: {message}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Parses source files of one language.
pub trait Frontend: Send + Sync {
    /// Short language id (e.g., "csharp").
    fn language_id(&self) -> &'static str;

    /// File extensions handled, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `source`, read from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar is unavailable or the parser gives up.
    fn parse(&self, path: &Path, source: &str) -> Result<ParsedUnit, FrontendError>;

    /// Returns true if `path` holds tool-generated code, which is never
    /// reported on. Frontends without a convention return false.
    fn is_generated(&self, _path: &Path, _source: &str) -> bool {
        false
    }

    /// Returns true if this frontend handles `path` by extension.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

/// Type alias for boxed frontends.
pub type FrontendBox = Box<dyn Frontend>;
