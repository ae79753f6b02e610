//! Rules against defensive null checks on guaranteed values.
//!
//! # Rationale
//!
//! The project is fail-fast: a component that must exist is declared with
//! `[RequireComponent]`, and a dependency that must exist is injected or
//! serialized. Checking such a value for null hides the wiring mistake
//! instead of surfacing it.
//!
//! # Detected Patterns
//!
//! - `if (GetComponent<Rigidbody>() != null)` and `== null`
//! - `if (GetComponent<Rigidbody>() is null)` and `is not null`
//! - `GetComponent<Rigidbody>()?.AddForce(...)`, also inside a longer chain
//!   such as `other?.GetComponent<Rigidbody>()?.AddForce(...)`
//! - the same three forms over a field or property marked `[Inject]` or
//!   `[SerializeField]`
//!
//! SR0003 covers acquisition calls, SR0004 covers marked members.

use strict_lint_core::query::{matches_watched, method_name_of};
use strict_lint_core::syntax::{ComparisonOp, LiteralKind, Pattern};
use strict_lint_core::{
    Diagnostic, DiagnosticSink, Node, NodeContext, NodeId, Rule, RuleDescriptor, SyntaxKind,
    SyntaxTree,
};

use crate::catalog::{NULL_GUARD_AFTER_GET_COMPONENT, NULL_GUARD_AFTER_INJECTION};
use crate::get_component_outside_init::ACQUISITION_METHODS;

/// Primary rule code; the rule also emits SR0004.
pub const CODE: &str = "SR0003";

/// Rule name.
pub const NAME: &str = "null-guard";

/// Attributes that guarantee a member is assigned.
pub const INJECTION_MARKERS: &[&str] = &["Inject", "SerializeField"];

/// Conventional attribute class suffix.
pub const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// A recognized null-guard construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullGuard {
    /// `guarded == null`, `guarded != null`, or mirrored.
    Comparison {
        /// The non-null operand.
        guarded: NodeId,
        /// Operator used.
        op: ComparisonOp,
    },
    /// `guarded is null` or `guarded is not null`.
    Pattern {
        /// The tested expression.
        guarded: NodeId,
        /// True for `is not null`.
        negated: bool,
    },
    /// `guarded?.member`
    ConditionalAccess {
        /// The chained-from expression, or the tail of a nested chain.
        guarded: NodeId,
    },
}

impl NullGuard {
    /// Recognizes a null guard at `node` (an `if` statement or a conditional access).
    #[must_use]
    pub fn of(tree: &SyntaxTree, node: NodeId) -> Option<Self> {
        match tree.get(node)? {
            Node::IfStatement { condition } => Self::of_condition(tree, *condition),
            Node::ConditionalAccess { expression, .. } => {
                // `a?.B()?.C()`: the outer chain guards the inner tail `B()`.
                let guarded = match tree.get(*expression)? {
                    Node::ConditionalAccess {
                        when_not_null: Some(tail),
                        ..
                    } => *tail,
                    _ => *expression,
                };
                Some(Self::ConditionalAccess { guarded })
            }
            _ => None,
        }
    }

    fn of_condition(tree: &SyntaxTree, condition: NodeId) -> Option<Self> {
        match tree.get(condition)? {
            Node::BinaryComparison { op, left, right } => {
                match (is_null(tree, *left), is_null(tree, *right)) {
                    (true, false) => Some(Self::Comparison {
                        guarded: *right,
                        op: *op,
                    }),
                    (false, true) => Some(Self::Comparison {
                        guarded: *left,
                        op: *op,
                    }),
                    _ => None,
                }
            }
            Node::IsPattern {
                expression,
                pattern,
            } => match pattern {
                Pattern::Constant(c) if is_null(tree, *c) => Some(Self::Pattern {
                    guarded: *expression,
                    negated: false,
                }),
                Pattern::Not(inner) => match inner.as_ref() {
                    Pattern::Constant(c) if is_null(tree, *c) => Some(Self::Pattern {
                        guarded: *expression,
                        negated: true,
                    }),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }

    /// The expression being tested for null.
    #[must_use]
    pub fn guarded(self) -> NodeId {
        match self {
            Self::Comparison { guarded, .. }
            | Self::Pattern { guarded, .. }
            | Self::ConditionalAccess { guarded } => guarded,
        }
    }
}

fn is_null(tree: &SyntaxTree, node: NodeId) -> bool {
    matches!(tree.get(node), Some(Node::Literal(LiteralKind::Null)))
}

/// Flags null guards over acquired components and injected members.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGuardRule;

impl NullGuardRule {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn has_injection_marker(ctx: &NodeContext<'_>, identifier: NodeId) -> bool {
        let Some(symbol) = ctx.resolve(identifier) else {
            return false;
        };
        if !symbol.is_field_or_property() {
            return false;
        }
        ctx.resolver.attributes_of(&symbol).iter().any(|attr| {
            INJECTION_MARKERS
                .iter()
                .any(|marker| attr.matches(marker, ATTRIBUTE_SUFFIX))
        })
    }
}

impl Rule for NullGuardRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids null checks on acquired components and injected or serialized members"
    }

    fn descriptors(&self) -> Vec<&'static RuleDescriptor> {
        vec![&NULL_GUARD_AFTER_GET_COMPONENT, &NULL_GUARD_AFTER_INJECTION]
    }

    fn interests(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::IfStatement, SyntaxKind::ConditionalAccess]
    }

    fn check(&self, ctx: &NodeContext<'_>, sink: &mut dyn DiagnosticSink) {
        if !ctx.is_project_code() {
            return;
        }

        let tree = ctx.tree;
        let Some(guard) = NullGuard::of(tree, ctx.node) else {
            return;
        };
        let guarded = guard.guarded();

        let descriptor = match tree.get(guarded) {
            Some(Node::Invocation { .. }) => method_name_of(tree, guarded)
                .filter(|name| matches_watched(name, ACQUISITION_METHODS))
                .map(|_| &NULL_GUARD_AFTER_GET_COMPONENT),
            Some(Node::Identifier { .. }) => Self::has_injection_marker(ctx, guarded)
                .then_some(&NULL_GUARD_AFTER_INJECTION),
            _ => None,
        };

        if let Some(descriptor) = descriptor {
            let none: [&str; 0] = [];
            sink.report(Diagnostic::from_descriptor(
                descriptor,
                ctx.location(ctx.node),
                &none,
            ));
        }
    }
}
