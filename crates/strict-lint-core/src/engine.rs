//! Node dispatcher: delivers subscribed nodes to rules.

use std::collections::BTreeMap;

use tracing::trace;

use crate::descriptor::RuleDescriptor;
use crate::rule::{DiagnosticSink, NodeContext, Rule, RuleBox};
use crate::scope::ScopeFilter;
use crate::symbols::SymbolResolver;
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};
use crate::types::Diagnostic;

/// Registered rules, indexed by the node kinds they subscribe to.
///
/// The engine is immutable once built and holds no per-run state, so a
/// single instance can analyze many trees concurrently.
pub struct Engine {
    rules: Vec<RuleBox>,
    subscriptions: BTreeMap<SyntaxKind, Vec<usize>>,
    scope: ScopeFilter,
}

impl Engine {
    /// Creates an engine with the default scope policy and no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scope(ScopeFilter::default())
    }

    /// Creates an engine with the given scope policy and no rules.
    #[must_use]
    pub fn with_scope(scope: ScopeFilter) -> Self {
        Self {
            rules: Vec::new(),
            subscriptions: BTreeMap::new(),
            scope,
        }
    }

    /// Registers a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(self, rule: R) -> Self {
        self.rule_box(Box::new(rule))
    }

    /// Registers a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        let index = self.rules.len();
        for kind in rule.interests() {
            let subscribers = self.subscriptions.entry(*kind).or_default();
            if !subscribers.contains(&index) {
                subscribers.push(index);
            }
        }
        self.rules.push(rule);
        self
    }

    /// Registers several boxed rules.
    #[must_use]
    pub fn rules(self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        rules.into_iter().fold(self, Self::rule_box)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Descriptors of every diagnostic the registered rules can emit.
    #[must_use]
    pub fn descriptors(&self) -> Vec<&'static RuleDescriptor> {
        let mut all: Vec<&'static RuleDescriptor> =
            self.rules.iter().flat_map(|r| r.descriptors()).collect();
        all.sort_by_key(|d| d.id);
        all.dedup_by_key(|d| d.id);
        all
    }

    /// Delivers one node to every rule subscribed to its kind.
    pub fn dispatch(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        resolver: &dyn SymbolResolver,
        sink: &mut dyn DiagnosticSink,
    ) {
        let Some(kind) = tree.kind(node) else {
            return;
        };
        let Some(subscribers) = self.subscriptions.get(&kind) else {
            return;
        };

        let ctx = NodeContext::new(tree, node, resolver, &self.scope);
        for &index in subscribers {
            let rule = &self.rules[index];
            trace!(rule = rule.name(), ?kind, node = node.index(), "dispatch");
            rule.check(&ctx, sink);
        }
    }

    /// Runs every subscribed rule over every node of `tree`.
    #[must_use]
    pub fn analyze(&self, tree: &SyntaxTree, resolver: &dyn SymbolResolver) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for node in tree.node_ids() {
            self.dispatch(tree, node, resolver, &mut diagnostics);
        }
        diagnostics
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::NullResolver;
    use crate::syntax::{Node, SyntaxTreeBuilder};
    use crate::types::Severity;

    static COUNT: RuleDescriptor = RuleDescriptor {
        id: "T0001",
        name: "count-calls",
        title: "Count calls",
        message_format: "call",
        category: "Test",
        default_severity: Severity::Info,
        enabled_by_default: true,
        description: "",
        help: "",
    };

    struct CountCalls;

    impl Rule for CountCalls {
        fn name(&self) -> &'static str {
            "count-calls"
        }
        fn code(&self) -> &'static str {
            "T0001"
        }
        fn descriptors(&self) -> Vec<&'static RuleDescriptor> {
            vec![&COUNT]
        }
        fn interests(&self) -> &'static [SyntaxKind] {
            // Duplicate subscriptions must not double-deliver.
            &[SyntaxKind::Invocation, SyntaxKind::Invocation]
        }
        fn check(&self, ctx: &NodeContext<'_>, sink: &mut dyn DiagnosticSink) {
            assert!(matches!(ctx.current(), Some(Node::Invocation { .. })));
            let empty: [&str; 0] = [];
            sink.report(Diagnostic::from_descriptor(&COUNT, ctx.location(ctx.node), &empty));
        }
    }

    fn two_calls() -> SyntaxTree {
        let mut b = SyntaxTreeBuilder::new("/p/Assets/a.cs");
        let f = b.ident("F");
        let first = b.call(f);
        let g = b.ident("G");
        let second = b.call(g);
        let method = b.method("Update", &[first, second]);
        let unit = b.unit(&[method]);
        b.finish(unit)
    }

    #[test]
    fn delivers_each_subscribed_node_once() {
        let engine = Engine::new().rule(CountCalls);
        let diagnostics = engine.analyze(&two_calls(), &NullResolver);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn analysis_is_repeatable() {
        let engine = Engine::new().rule(CountCalls);
        let tree = two_calls();
        let first = engine.analyze(&tree, &NullResolver);
        let second = engine.analyze(&tree, &NullResolver);
        assert_eq!(first, second);
    }

    #[test]
    fn descriptors_are_deduplicated() {
        let engine = Engine::new().rule(CountCalls).rule(CountCalls);
        assert_eq!(engine.rule_count(), 2);
        assert_eq!(engine.descriptors().len(), 1);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
