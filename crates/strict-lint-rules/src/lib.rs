//! # strict-lint-rules
//!
//! Built-in Unity rules for strict-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | SR0001 | `get-component-outside-init` | `GetComponent` family outside `Awake`/`Start` in a `MonoBehaviour` |
//! | SR0002 | `forbidden-find-method` | `Find*` scene lookups inside `Update`, `FixedUpdate`, `LateUpdate`, `OnGUI` |
//! | SR0003 | `null-guard-after-get-component` | Null check on a `GetComponent` result |
//! | SR0004 | `null-guard-after-injection` | Null check on an `[Inject]`/`[SerializeField]` member |
//!
//! SR0003 and SR0004 are both emitted by [`NullGuardRule`].
//!
//! ## Usage
//!
//! ```ignore
//! use strict_lint_core::Analyzer;
//! use strict_lint_rules::{ForbiddenFindMethod, GetComponentOutsideInit};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./MyGame")
//!     .rule(GetComponentOutsideInit::new())
//!     .rule(ForbiddenFindMethod::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Static diagnostic descriptors.
pub mod catalog;
mod forbidden_find_method;
mod get_component_outside_init;
mod null_guard;
mod presets;

pub use forbidden_find_method::ForbiddenFindMethod;
pub use get_component_outside_init::GetComponentOutsideInit;
pub use null_guard::{NullGuard, NullGuardRule};
pub use presets::{all_rules, performance_rules, Preset};

/// Re-export core types for convenience.
pub use strict_lint_core::{Diagnostic, Rule, Severity};
