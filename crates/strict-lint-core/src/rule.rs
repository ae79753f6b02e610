//! Rule trait and the per-node context rules receive.

use crate::descriptor::RuleDescriptor;
use crate::scope::ScopeFilter;
use crate::symbols::{Symbol, SymbolResolver};
use crate::syntax::{Node, NodeId, SyntaxKind, SyntaxTree};
use crate::types::{Diagnostic, Location};

/// Receives diagnostics from rules. The host owns formatting and filtering.
pub trait DiagnosticSink {
    /// Accepts one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Everything a rule may look at while checking one node.
///
/// All references are read-only borrows of host-owned data; nothing here
/// outlives the callback.
#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
    /// The tree the node belongs to.
    pub tree: &'a SyntaxTree,
    /// The node being checked.
    pub node: NodeId,
    /// Host symbol resolver.
    pub resolver: &'a dyn SymbolResolver,
    /// Shared scope policy.
    pub scope: &'a ScopeFilter,
}

impl<'a> NodeContext<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(
        tree: &'a SyntaxTree,
        node: NodeId,
        resolver: &'a dyn SymbolResolver,
        scope: &'a ScopeFilter,
    ) -> Self {
        Self {
            tree,
            node,
            resolver,
            scope,
        }
    }

    /// The node being checked.
    #[must_use]
    pub fn current(&self) -> Option<&'a Node> {
        self.tree.get(self.node)
    }

    /// Returns true if the node's file is first-party project code.
    #[must_use]
    pub fn is_project_code(&self) -> bool {
        self.scope.is_project_code(self.tree.path())
    }

    /// Resolves the symbol behind `node`.
    #[must_use]
    pub fn resolve(&self, node: NodeId) -> Option<Symbol> {
        self.resolver.resolve(self.tree, node)
    }

    /// Location of `node`.
    #[must_use]
    pub fn location(&self, node: NodeId) -> Location {
        self.tree.location(node)
    }
}

/// A node-level lint rule.
///
/// A rule declares which node kinds it wants via [`Rule::interests`]; the
/// engine delivers each node of those kinds exactly once. Rules hold no
/// per-call state, so one instance may be used from many threads.
///
/// # Example
///
/// ```ignore
/// use strict_lint_core::{DiagnosticSink, NodeContext, Rule, RuleDescriptor, SyntaxKind};
///
/// pub struct NoGoto;
///
/// impl Rule for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///     fn code(&self) -> &'static str { "X0001" }
///     fn descriptors(&self) -> Vec<&'static RuleDescriptor> { vec![&NO_GOTO] }
///     fn interests(&self) -> &'static [SyntaxKind] { &[SyntaxKind::Other] }
///
///     fn check(&self, ctx: &NodeContext<'_>, sink: &mut dyn DiagnosticSink) {
///         // ...
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the primary rule code (e.g., "SR0001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Descriptors of every diagnostic this rule can emit.
    fn descriptors(&self) -> Vec<&'static RuleDescriptor>;

    /// Node kinds this rule subscribes to.
    fn interests(&self) -> &'static [SyntaxKind];

    /// Checks one node of a subscribed kind.
    fn check(&self, ctx: &NodeContext<'_>, sink: &mut dyn DiagnosticSink);
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::NullResolver;
    use crate::syntax::SyntaxTreeBuilder;
    use crate::types::Severity;

    static TEST_DESCRIPTOR: RuleDescriptor = RuleDescriptor {
        id: "TEST001",
        name: "test-rule",
        title: "Test",
        message_format: "found {0}",
        category: "Test",
        default_severity: Severity::Warning,
        enabled_by_default: true,
        description: "",
        help: "",
    };

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn descriptors(&self) -> Vec<&'static RuleDescriptor> {
            vec![&TEST_DESCRIPTOR]
        }
        fn interests(&self) -> &'static [SyntaxKind] {
            &[SyntaxKind::Identifier]
        }

        fn check(&self, ctx: &NodeContext<'_>, sink: &mut dyn DiagnosticSink) {
            if let Some(Node::Identifier { name }) = ctx.current() {
                sink.report(Diagnostic::from_descriptor(
                    &TEST_DESCRIPTOR,
                    ctx.location(ctx.node),
                    &[name.as_str()],
                ));
            }
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.descriptors()[0].id, rule.code());
    }

    #[test]
    fn vec_is_a_sink() {
        let mut b = SyntaxTreeBuilder::new("/p/Assets/a.cs");
        let id = b.ident("speed");
        let tree = b.finish(id);
        let scope = ScopeFilter::default();
        let ctx = NodeContext::new(&tree, id, &NullResolver, &scope);

        let mut sink: Vec<Diagnostic> = Vec::new();
        TestRule.check(&ctx, &mut sink);

        assert!(ctx.is_project_code());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].message, "found speed");
        assert_eq!(sink[0].args, vec!["speed".to_string()]);
    }
}
