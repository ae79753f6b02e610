//! # strict-lint-cs
//!
//! Tree-sitter based C# frontend for strict-lint.
//!
//! This crate parses Unity C# sources with `tree-sitter-c-sharp` and hands
//! `strict-lint-core` what its rules need:
//!
//! - [`CSharpFrontend`], the [`Frontend`](strict_lint_core::Frontend) for `.cs` files
//! - [`FileResolver`], a per-file symbol resolver backed by a built-in model
//!   of the `UnityEngine` component hierarchy
//! - [`FileModel`], the declarations collected while lowering a file

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod frontend;
mod lower;
mod runtime;
mod symbols;

pub use frontend::CSharpFrontend;
pub use symbols::{ClassInfo, FileModel, FileResolver, MemberInfo, MethodInfo};
