//! Rule to keep component acquisition inside initialization methods.
//!
//! # Rationale
//!
//! `GetComponent` and its relatives walk the component list of a game
//! object and may allocate. Called from `Update` or an event handler they
//! run every frame. The component should be fetched once in `Awake` or
//! `Start` and cached, or injected.
//!
//! # Detected Patterns
//!
//! - `GetComponent<T>()`, `gameObject.GetComponent(...)`, `other?.GetComponent<T>()`
//!   and the `Components`/`InChildren`/`InParent` variants
//! - inside any method other than `Awake` or `Start`
//! - of a class deriving from `UnityEngine.MonoBehaviour`
//!
//! # Allowed Patterns
//!
//! - Calls in `Awake` or `Start`
//! - Calls outside any method (field initializers)
//! - Calls in classes that are not behaviours

use strict_lint_core::query::{enclosing_method_name, enclosing_type, matches_watched, method_name_of};
use strict_lint_core::{
    Diagnostic, DiagnosticSink, NodeContext, Rule, RuleDescriptor, SymbolKind, SyntaxKind,
};
use tracing::trace;

use crate::catalog::GET_COMPONENT_OUTSIDE_INIT;

/// Rule code for get-component-outside-init.
pub const CODE: &str = "SR0001";

/// Rule name for get-component-outside-init.
pub const NAME: &str = "get-component-outside-init";

/// Component acquisition methods.
pub const ACQUISITION_METHODS: &[&str] = &[
    "GetComponent",
    "GetComponents",
    "GetComponentInChildren",
    "GetComponentsInChildren",
    "GetComponentInParent",
    "GetComponentsInParent",
];

/// Methods in which acquisition is allowed.
pub const ALLOWED_INITIALIZERS: &[&str] = &["Awake", "Start"];

/// Base type of every behaviour component.
pub const COMPONENT_BASE: &str = "MonoBehaviour";

/// Namespace of the Unity runtime.
pub const RUNTIME_NAMESPACE: &str = "UnityEngine";

/// Flags component acquisition outside `Awake`/`Start`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetComponentOutsideInit;

impl GetComponentOutsideInit {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for GetComponentOutsideInit {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Restricts GetComponent-family calls to Awake and Start"
    }

    fn descriptors(&self) -> Vec<&'static RuleDescriptor> {
        vec![&GET_COMPONENT_OUTSIDE_INIT]
    }

    fn interests(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::Invocation]
    }

    fn check(&self, ctx: &NodeContext<'_>, sink: &mut dyn DiagnosticSink) {
        if !ctx.is_project_code() {
            return;
        }

        let tree = ctx.tree;
        let Some(method_name) = method_name_of(tree, ctx.node) else {
            return;
        };
        if !matches_watched(method_name, ACQUISITION_METHODS) {
            return;
        }

        let Some(enclosing) = enclosing_method_name(tree, ctx.node) else {
            return;
        };
        if ALLOWED_INITIALIZERS.iter().any(|allowed| *allowed == enclosing) {
            return;
        }

        let Some(class) = enclosing_type(tree, ctx.node) else {
            return;
        };
        let is_behaviour = ctx.resolve(class).is_some_and(|symbol| {
            symbol.kind == SymbolKind::Type && symbol.derives_from(COMPONENT_BASE, RUNTIME_NAMESPACE)
        });
        if !is_behaviour {
            trace!(method_name, enclosing, "enclosing type is not a behaviour");
            return;
        }

        sink.report(Diagnostic::from_descriptor(
            &GET_COMPONENT_OUTSIDE_INIT,
            ctx.location(ctx.node),
            &[method_name, enclosing],
        ));
    }
}
