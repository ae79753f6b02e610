//! Rule to forbid scene-wide lookups in per-frame methods.
//!
//! # Rationale
//!
//! `Object.FindObjectOfType`, `GameObject.Find` and friends scan the whole
//! scene. Inside `Update` they run every frame, and the string-based ones
//! break silently when objects are renamed.
//!
//! # Detected Patterns
//!
//! - `GameObject.Find("Player")`, `Object.FindObjectOfType<Camera>()`,
//!   `FindAnyObjectByType<T>()` and other `Find*` lookups
//! - inside `Update`, `FixedUpdate`, `LateUpdate` or `OnGUI`
//! - resolving to a method declared in `UnityEngine`
//!
//! # Allowed Patterns
//!
//! - Lookups in any other method
//! - User-defined methods that happen to be called `Find`
//! - `transform.Find(...)` and other receivers that are not `Object`/`GameObject`

use strict_lint_core::query::{enclosing_method_name, matches_watched, method_name_of};
use strict_lint_core::{
    Diagnostic, DiagnosticSink, Node, NodeContext, NodeId, Rule, RuleDescriptor, SyntaxKind,
    SyntaxTree,
};

use crate::catalog::FORBIDDEN_FIND_METHOD;

/// Rule code for forbidden-find-method.
pub const CODE: &str = "SR0002";

/// Rule name for forbidden-find-method.
pub const NAME: &str = "forbidden-find-method";

/// Scene lookup methods.
pub const LOOKUP_METHODS: &[&str] = &[
    "FindObjectOfType",
    "FindObjectsOfType",
    "FindAnyObjectByType",
    "FindObjectsByType",
    "FindFirstObjectByType",
    "Find",
    "FindWithTag",
    "FindGameObjectWithTag",
    "FindGameObjectsWithTag",
];

/// Receiver names a qualified lookup must use.
pub const LOOKUP_OWNERS: &[&str] = &["Object", "GameObject"];

/// Methods the runtime calls every frame.
pub const PER_FRAME_METHODS: &[&str] = &["Update", "FixedUpdate", "LateUpdate", "OnGUI"];

/// Namespace of the Unity runtime.
pub const RUNTIME_NAMESPACE: &str = "UnityEngine";

/// Forbids `Find*` lookups inside per-frame methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbiddenFindMethod;

impl ForbiddenFindMethod {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// The syntactic receiver of a call, if it is a bare identifier.
///
/// `GameObject.Find()` yields `GameObject`; `Find()`, `this.Find()` and
/// `UnityEngine.Object.Find()` yield `None`.
fn owner_of(tree: &SyntaxTree, call: NodeId) -> Option<&str> {
    let Some(Node::Invocation { callee }) = tree.get(call) else {
        return None;
    };
    let Some(Node::MemberAccess { receiver, .. }) = tree.get(*callee) else {
        return None;
    };
    match tree.get(*receiver)? {
        Node::Identifier { name } => Some(name.as_str()),
        _ => None,
    }
}

impl Rule for ForbiddenFindMethod {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids scene-wide Find lookups in Update, FixedUpdate, LateUpdate and OnGUI"
    }

    fn descriptors(&self) -> Vec<&'static RuleDescriptor> {
        vec![&FORBIDDEN_FIND_METHOD]
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
        if !matches_watched(method_name, LOOKUP_METHODS) {
            return;
        }

        if let Some(owner) = owner_of(tree, ctx.node) {
            if !LOOKUP_OWNERS.iter().any(|o| *o == owner) {
                return;
            }
        }

        let in_frame_method = enclosing_method_name(tree, ctx.node)
            .is_some_and(|m| PER_FRAME_METHODS.iter().any(|p| *p == m));
        if !in_frame_method {
            return;
        }

        let Some(target) = ctx.resolve(ctx.node) else {
            return;
        };
        let Some(declaring) = target.containing_type else {
            return;
        };
        if declaring.namespace.as_deref() != Some(RUNTIME_NAMESPACE) {
            return;
        }

        let qualified = format!("{}.{method_name}", declaring.name);
        sink.report(Diagnostic::from_descriptor(
            &FORBIDDEN_FIND_METHOD,
            ctx.location(ctx.node),
            &[qualified],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strict_lint_core::symbols::MapResolver;
    use strict_lint_core::{Engine, Symbol, SymbolKind, SyntaxTreeBuilder, TypeName};

    const PROJECT: &str = "/Game/Assets/Scripts/Enemy.cs";

    fn runtime_method(owner: &str, name: &str) -> Symbol {
        Symbol::new(name, SymbolKind::Method)
            .in_type(TypeName::new(owner, Some("UnityEngine")))
            .in_namespace("UnityEngine")
    }

    /// `class Enemy { void <method>() { <owner>.<name>(); } }`, or unqualified without owner.
    fn lookup_in(path: &str, method: &str, owner: Option<&str>, name: &str) -> (SyntaxTree, NodeId) {
        let mut b = SyntaxTreeBuilder::new(path);
        let callee = match owner {
            Some(owner) => {
                let recv = b.ident(owner);
                let member = b.ident(name);
                b.member(recv, member)
            }
            None => b.ident(name),
        };
        let call = b.call(callee);
        let stmt = b.other("expression_statement", &[call]);
        let decl = b.method(method, &[stmt]);
        let class = b.class("Enemy", &[decl]);
        let unit = b.unit(&[class]);
        (b.finish(unit), call)
    }

    fn run(tree: &SyntaxTree, resolver: &MapResolver) -> Vec<Diagnostic> {
        Engine::new().rule(ForbiddenFindMethod::new()).analyze(tree, resolver)
    }

    #[test]
    fn flags_game_object_find_in_update() {
        let (tree, call) = lookup_in(PROJECT, "Update", Some("GameObject"), "Find");
        let resolver = MapResolver::new().bind(call, runtime_method("GameObject", "Find"));

        let diagnostics = run(&tree, &resolver);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert_eq!(diagnostics[0].args, vec!["GameObject.Find"]);
        assert_eq!(
            diagnostics[0].message,
            "'GameObject.Find' is forbidden. Use DI (VContainer) or SerializeField instead."
        );
    }

    #[test]
    fn reports_declaring_type_not_receiver() {
        let (tree, call) = lookup_in(PROJECT, "FixedUpdate", Some("GameObject"), "FindObjectOfType");
        let resolver = MapResolver::new().bind(call, runtime_method("Object", "FindObjectOfType"));

        let diagnostics = run(&tree, &resolver);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].args, vec!["Object.FindObjectOfType"]);
    }

    #[test]
    fn every_per_frame_method_is_watched() {
        for method in PER_FRAME_METHODS {
            let (tree, call) = lookup_in(PROJECT, method, Some("Object"), "FindAnyObjectByType");
            let resolver =
                MapResolver::new().bind(call, runtime_method("Object", "FindAnyObjectByType"));
            assert_eq!(run(&tree, &resolver).len(), 1, "{method}");
        }
    }

    #[test]
    fn allowed_outside_per_frame_methods() {
        for method in ["Awake", "Start", "OnEnable", "UpdateScore"] {
            let (tree, call) = lookup_in(PROJECT, method, Some("GameObject"), "Find");
            let resolver = MapResolver::new().bind(call, runtime_method("GameObject", "Find"));
            assert!(run(&tree, &resolver).is_empty(), "{method}");
        }
    }

    #[test]
    fn other_receivers_are_ignored() {
        let (tree, call) = lookup_in(PROJECT, "Update", Some("transform"), "Find");
        let resolver = MapResolver::new().bind(call, runtime_method("Transform", "Find"));
        assert!(run(&tree, &resolver).is_empty());
    }

    #[test]
    fn user_defined_look_alikes_are_ignored() {
        let (tree, call) = lookup_in(PROJECT, "Update", None, "Find");
        let user = Symbol::new("Find", SymbolKind::Method)
            .in_type(TypeName::new("Enemy", Some("Game")))
            .in_namespace("Game");
        let resolver = MapResolver::new().bind(call, user);
        assert!(run(&tree, &resolver).is_empty());
    }

    #[test]
    fn unqualified_runtime_calls_are_flagged() {
        let (tree, call) = lookup_in(PROJECT, "Update", None, "FindFirstObjectByType");
        let resolver =
            MapResolver::new().bind(call, runtime_method("Object", "FindFirstObjectByType"));

        let diagnostics = run(&tree, &resolver);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].args, vec!["Object.FindFirstObjectByType"]);
    }

    #[test]
    fn unresolved_calls_are_ignored() {
        let (tree, _) = lookup_in(PROJECT, "Update", Some("GameObject"), "Find");
        assert!(run(&tree, &MapResolver::new()).is_empty());
    }

    #[test]
    fn out_of_scope_files_are_ignored() {
        let (tree, call) = lookup_in(
            "/Game/Packages/com.unity.cinemachine/Runtime/Brain.cs",
            "Update",
            Some("GameObject"),
            "Find",
        );
        let resolver = MapResolver::new().bind(call, runtime_method("GameObject", "Find"));
        assert!(run(&tree, &resolver).is_empty());
    }

    #[test]
    fn owner_requires_bare_identifier() {
        let mut b = SyntaxTreeBuilder::new(PROJECT);
        let ns = b.ident("UnityEngine");
        let ty = b.ident("Object");
        let qualified = b.member(ns, ty);
        let name = b.generic("FindObjectsByType");
        let callee = b.member(qualified, name);
        let call = b.call(callee);
        let tree = b.finish(call);

        assert_eq!(owner_of(&tree, call), None);
    }
}
