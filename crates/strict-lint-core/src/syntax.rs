//! Language-neutral syntax model consumed by rules.
//!
//! A [`SyntaxTree`] is an arena of [`Node`]s owned by the host. Rules only
//! read it: they follow parent links to find enclosing declarations and
//! the child ids stored inside node variants to inspect sub-expressions.
//!
//! The node set is closed. Constructs no rule cares about are lowered to
//! [`Node::Other`] so ancestor walks still pass through them.

use std::path::{Path, PathBuf};

use crate::types::Location;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range plus the 1-indexed line/column of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line of `start` (1-indexed).
    pub line: usize,
    /// Column of `start` (1-indexed).
    pub column: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for an empty span.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Equality operator of a [`Node::BinaryComparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
}

/// Literal flavours the rules distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `null`
    Null,
    /// Any other literal.
    Other,
}

/// Pattern on the right-hand side of an `is` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A constant pattern such as `null` or `42`.
    Constant(NodeId),
    /// `not <pattern>`
    Not(Box<Pattern>),
    /// Type, declaration, relational and other pattern forms.
    Other,
}

/// A syntax node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Root of a file.
    CompilationUnit,
    /// `class Name : Base { ... }`
    ClassDeclaration {
        /// Declared type name.
        name: String,
    },
    /// A method declaration.
    MethodDeclaration {
        /// Declared method name.
        name: String,
    },
    /// `if (condition) ...`
    IfStatement {
        /// The condition expression.
        condition: NodeId,
    },
    /// `expression?.member`
    ConditionalAccess {
        /// The chained-from expression.
        expression: NodeId,
        /// What is evaluated when `expression` is non-null.
        when_not_null: Option<NodeId>,
    },
    /// A call expression.
    Invocation {
        /// The called expression.
        callee: NodeId,
    },
    /// A bare identifier.
    Identifier {
        /// Identifier text.
        name: String,
    },
    /// `Name<T, ...>`
    GenericName {
        /// Name without type arguments.
        name: String,
    },
    /// `receiver.name`
    MemberAccess {
        /// Expression on the left of the dot.
        receiver: NodeId,
        /// Accessed member, an `Identifier` or `GenericName`.
        name: NodeId,
    },
    /// `.name` inside a conditional access.
    MemberBinding {
        /// Bound member, an `Identifier` or `GenericName`.
        name: NodeId,
    },
    /// `expression is pattern`
    IsPattern {
        /// Tested expression.
        expression: NodeId,
        /// The pattern.
        pattern: Pattern,
    },
    /// `left == right` or `left != right`
    BinaryComparison {
        /// Operator.
        op: ComparisonOp,
        /// Left operand.
        left: NodeId,
        /// Right operand.
        right: NodeId,
    },
    /// A literal value.
    Literal(LiteralKind),
    /// Anything else; `kind` is the host's label for it.
    Other {
        /// Host-specific node kind, for debugging.
        kind: String,
    },
}

/// Field-less discriminant of [`Node`], used for rule subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyntaxKind {
    /// [`Node::CompilationUnit`]
    CompilationUnit,
    /// [`Node::ClassDeclaration`]
    ClassDeclaration,
    /// [`Node::MethodDeclaration`]
    MethodDeclaration,
    /// [`Node::IfStatement`]
    IfStatement,
    /// [`Node::ConditionalAccess`]
    ConditionalAccess,
    /// [`Node::Invocation`]
    Invocation,
    /// [`Node::Identifier`]
    Identifier,
    /// [`Node::GenericName`]
    GenericName,
    /// [`Node::MemberAccess`]
    MemberAccess,
    /// [`Node::MemberBinding`]
    MemberBinding,
    /// [`Node::IsPattern`]
    IsPattern,
    /// [`Node::BinaryComparison`]
    BinaryComparison,
    /// [`Node::Literal`]
    Literal,
    /// [`Node::Other`]
    Other,
}

impl Node {
    /// Returns the node's kind.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::CompilationUnit => SyntaxKind::CompilationUnit,
            Self::ClassDeclaration { .. } => SyntaxKind::ClassDeclaration,
            Self::MethodDeclaration { .. } => SyntaxKind::MethodDeclaration,
            Self::IfStatement { .. } => SyntaxKind::IfStatement,
            Self::ConditionalAccess { .. } => SyntaxKind::ConditionalAccess,
            Self::Invocation { .. } => SyntaxKind::Invocation,
            Self::Identifier { .. } => SyntaxKind::Identifier,
            Self::GenericName { .. } => SyntaxKind::GenericName,
            Self::MemberAccess { .. } => SyntaxKind::MemberAccess,
            Self::MemberBinding { .. } => SyntaxKind::MemberBinding,
            Self::IsPattern { .. } => SyntaxKind::IsPattern,
            Self::BinaryComparison { .. } => SyntaxKind::BinaryComparison,
            Self::Literal(_) => SyntaxKind::Literal,
            Self::Other { .. } => SyntaxKind::Other,
        }
    }

    /// Child ids referenced from this node's fields, in source order.
    fn referenced(&self) -> Vec<NodeId> {
        match self {
            Self::IfStatement { condition } => vec![*condition],
            Self::ConditionalAccess {
                expression,
                when_not_null,
            } => std::iter::once(*expression).chain(*when_not_null).collect(),
            Self::Invocation { callee } => vec![*callee],
            Self::MemberAccess { receiver, name } => vec![*receiver, *name],
            Self::MemberBinding { name } => vec![*name],
            Self::IsPattern {
                expression,
                pattern,
            } => {
                let mut ids = vec![*expression];
                let mut p = pattern;
                loop {
                    match p {
                        Pattern::Constant(id) => {
                            ids.push(*id);
                            break;
                        }
                        Pattern::Not(inner) => p = inner,
                        Pattern::Other => break,
                    }
                }
                ids
            }
            Self::BinaryComparison { left, right, .. } => vec![*left, *right],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    node: Node,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable syntax tree for one source file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    path: PathBuf,
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    /// Path of the file this tree was parsed from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root node, if the tree is non-empty.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).map(|d| &d.node)
    }

    /// Kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<SyntaxKind> {
        self.get(id).map(Node::kind)
    }

    /// Parent of a node; `None` for the root or an unknown id.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|d| d.parent)
    }

    /// Children of a node in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .map_or(&[], |d| d.children.as_slice())
    }

    /// Span of a node.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes.get(id.index()).map(|d| d.span).unwrap_or_default()
    }

    /// Iterates over the strict ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Iterates over every node id.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter_map(|i| u32::try_from(i).ok().map(NodeId))
    }

    /// Source location of a node.
    #[must_use]
    pub fn location(&self, id: NodeId) -> Location {
        let span = self.span(id);
        Location::new(self.path.clone(), span.line, span.column).with_span(span.start, span.len())
    }
}

/// Iterator returned by [`SyntaxTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

/// Bottom-up builder for [`SyntaxTree`].
///
/// Children are created before their parent. Creating a node adopts every
/// id referenced from its fields plus any extra children passed in.
///
/// The shorthand constructors (`ident`, `call`, `class`, ...) give each node
/// a distinct synthetic span, which is what tests want.
#[derive(Debug)]
pub struct SyntaxTreeBuilder {
    path: PathBuf,
    nodes: Vec<NodeData>,
}

impl SyntaxTreeBuilder {
    /// Starts a tree for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            nodes: Vec::new(),
        }
    }

    /// Adds a node with an explicit span, adopting referenced and extra children.
    pub fn push(
        &mut self,
        node: Node,
        span: Span,
        extra_children: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        let mut children = node.referenced();
        children.extend(extra_children);
        children.sort_by_key(|c| self.nodes.get(c.index()).map_or(0, |d| d.span.start));
        children.dedup();

        for child in &children {
            if let Some(data) = self.nodes.get_mut(child.index()) {
                data.parent = Some(id);
            }
        }

        self.nodes.push(NodeData {
            node,
            span,
            parent: None,
            children,
        });
        id
    }

    /// Finishes the tree with `root` as its root node.
    #[must_use]
    pub fn finish(self, root: NodeId) -> SyntaxTree {
        let root = (root.index() < self.nodes.len()).then_some(root);
        SyntaxTree {
            path: self.path,
            nodes: self.nodes,
            root,
        }
    }

    fn synthetic(&mut self, node: Node, extra: &[NodeId]) -> NodeId {
        let n = self.nodes.len();
        let span = Span::new(n * 10, n * 10 + 5, n + 1, 1);
        self.push(node, span, extra.iter().copied())
    }

    /// `name`
    pub fn ident(&mut self, name: &str) -> NodeId {
        self.synthetic(
            Node::Identifier {
                name: name.to_string(),
            },
            &[],
        )
    }

    /// `name<...>`
    pub fn generic(&mut self, name: &str) -> NodeId {
        self.synthetic(
            Node::GenericName {
                name: name.to_string(),
            },
            &[],
        )
    }

    /// `null`
    pub fn null(&mut self) -> NodeId {
        self.synthetic(Node::Literal(LiteralKind::Null), &[])
    }

    /// A non-null literal.
    pub fn literal(&mut self) -> NodeId {
        self.synthetic(Node::Literal(LiteralKind::Other), &[])
    }

    /// `receiver.name`
    pub fn member(&mut self, receiver: NodeId, name: NodeId) -> NodeId {
        self.synthetic(Node::MemberAccess { receiver, name }, &[])
    }

    /// `.name` inside a conditional access.
    pub fn binding(&mut self, name: NodeId) -> NodeId {
        self.synthetic(Node::MemberBinding { name }, &[])
    }

    /// `callee(...)`
    pub fn call(&mut self, callee: NodeId) -> NodeId {
        self.synthetic(Node::Invocation { callee }, &[])
    }

    /// `expression?.when_not_null`
    pub fn conditional_access(&mut self, expression: NodeId, when_not_null: Option<NodeId>) -> NodeId {
        self.synthetic(
            Node::ConditionalAccess {
                expression,
                when_not_null,
            },
            &[],
        )
    }

    /// `left op right`
    pub fn compare(&mut self, op: ComparisonOp, left: NodeId, right: NodeId) -> NodeId {
        self.synthetic(Node::BinaryComparison { op, left, right }, &[])
    }

    /// `expression is pattern`
    pub fn is_pattern(&mut self, expression: NodeId, pattern: Pattern) -> NodeId {
        self.synthetic(
            Node::IsPattern {
                expression,
                pattern,
            },
            &[],
        )
    }

    /// `if (condition) { body }`
    pub fn if_stmt(&mut self, condition: NodeId, body: &[NodeId]) -> NodeId {
        self.synthetic(Node::IfStatement { condition }, body)
    }

    /// A statement or other construct wrapping `children`.
    pub fn other(&mut self, kind: &str, children: &[NodeId]) -> NodeId {
        self.synthetic(
            Node::Other {
                kind: kind.to_string(),
            },
            children,
        )
    }

    /// A method declaration containing `body`.
    pub fn method(&mut self, name: &str, body: &[NodeId]) -> NodeId {
        self.synthetic(
            Node::MethodDeclaration {
                name: name.to_string(),
            },
            body,
        )
    }

    /// A class declaration containing `members`.
    pub fn class(&mut self, name: &str, members: &[NodeId]) -> NodeId {
        self.synthetic(
            Node::ClassDeclaration {
                name: name.to_string(),
            },
            members,
        )
    }

    /// A compilation unit containing `items`; call [`Self::finish`] with it.
    pub fn unit(&mut self, items: &[NodeId]) -> NodeId {
        self.synthetic(Node::CompilationUnit, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SyntaxTree, NodeId, NodeId, NodeId) {
        let mut b = SyntaxTreeBuilder::new("/proj/Assets/Player.cs");
        let name = b.generic("GetComponent");
        let call = b.call(name);
        let stmt = b.other("expression_statement", &[call]);
        let method = b.method("Update", &[stmt]);
        let class = b.class("Player", &[method]);
        let unit = b.unit(&[class]);
        (b.finish(unit), call, method, class)
    }

    #[test]
    fn builder_links_parents() {
        let (tree, call, method, class) = sample();
        let ancestors: Vec<NodeId> = tree.ancestors(call).collect();
        assert!(ancestors.contains(&method));
        assert!(ancestors.contains(&class));
        assert_eq!(ancestors.last().copied(), tree.root());
    }

    #[test]
    fn referenced_children_are_adopted() {
        let (tree, call, _, _) = sample();
        let Some(Node::Invocation { callee }) = tree.get(call) else {
            panic!("expected invocation");
        };
        assert_eq!(tree.parent(*callee), Some(call));
        assert_eq!(tree.children(call), &[*callee]);
    }

    #[test]
    fn pattern_constants_are_children() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let x = b.ident("x");
        let null = b.null();
        let test = b.is_pattern(x, Pattern::Not(Box::new(Pattern::Constant(null))));
        let unit = b.unit(&[test]);
        let tree = b.finish(unit);
        assert_eq!(tree.parent(null), Some(test));
    }

    #[test]
    fn location_carries_path_and_span() {
        let (tree, call, _, _) = sample();
        let loc = tree.location(call);
        assert_eq!(loc.file, PathBuf::from("/proj/Assets/Player.cs"));
        assert_eq!(loc.line, call.index() + 1);
        assert_eq!(loc.length, 5);
    }

    #[test]
    fn unknown_ids_degrade_gracefully() {
        let (tree, _, _, _) = sample();
        let bogus = NodeId(9_999);
        assert!(tree.get(bogus).is_none());
        assert!(tree.parent(bogus).is_none());
        assert!(tree.children(bogus).is_empty());
        assert_eq!(tree.ancestors(bogus).count(), 0);
    }

    #[test]
    fn kinds_match_variants() {
        let (tree, call, method, class) = sample();
        assert_eq!(tree.kind(call), Some(SyntaxKind::Invocation));
        assert_eq!(tree.kind(method), Some(SyntaxKind::MethodDeclaration));
        assert_eq!(tree.kind(class), Some(SyntaxKind::ClassDeclaration));
    }
}
