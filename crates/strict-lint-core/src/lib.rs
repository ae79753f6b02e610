//! # strict-lint-core
//!
//! Core framework for strict-lint, a rule-based analyzer for Unity C# code.
//!
//! This crate is host-agnostic. It provides:
//!
//! - [`SyntaxTree`], the closed node model rules inspect
//! - [`SymbolResolver`], the seam through which a host answers semantic queries
//! - [`ScopeFilter`], which separates project code from vendored packages
//! - [`Rule`] and [`Engine`], which deliver nodes to rules by kind
//! - [`Analyzer`], which walks a project, parses files through a [`Frontend`]
//!   and collects [`Diagnostic`]s
//!
//! ## Example
//!
//! ```ignore
//! use strict_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./MyGame")
//!     .frontend(CSharpFrontend::new())
//!     .rules(strict_lint_rules::all_rules())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod descriptor;
mod engine;
mod frontend;
mod rule;
mod scope;
mod types;

/// Shared syntax queries for rule implementations.
pub mod query;
/// Semantic symbol model.
pub mod symbols;
/// Syntax tree model.
pub mod syntax;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError};
pub use descriptor::RuleDescriptor;
pub use engine::Engine;
pub use frontend::{Frontend, FrontendBox, FrontendError, ParsedUnit};
pub use rule::{DiagnosticSink, NodeContext, Rule, RuleBox};
pub use scope::{ScopeConfig, ScopeFilter};
pub use symbols::{AttributeMarker, Symbol, SymbolKind, SymbolResolver, TypeName};
pub use syntax::{Node, NodeId, Span, SyntaxKind, SyntaxTree, SyntaxTreeBuilder};
pub use types::{Diagnostic, DiagnosticReport, LintResult, Location, Severity, Suggestion};
