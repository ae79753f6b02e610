//! Shared syntax queries used by rules.

use crate::syntax::{Node, NodeId, SyntaxTree};

/// Returns the method name invoked by the call `call`.
///
/// Handles `Name(...)`, `recv.Name(...)`, `Name<T>(...)` and `recv?.Name(...)`.
/// Any other callee shape, or a node that is not a call, yields `None`.
#[must_use]
pub fn method_name_of(tree: &SyntaxTree, call: NodeId) -> Option<&str> {
    let Some(Node::Invocation { callee }) = tree.get(call) else {
        return None;
    };
    match tree.get(*callee)? {
        Node::Identifier { name } | Node::GenericName { name } => Some(name.as_str()),
        Node::MemberAccess { name, .. } | Node::MemberBinding { name } => simple_name(tree, *name),
        _ => None,
    }
}

/// Text of an `Identifier` or `GenericName` node.
#[must_use]
pub fn simple_name(tree: &SyntaxTree, node: NodeId) -> Option<&str> {
    match tree.get(node)? {
        Node::Identifier { name } | Node::GenericName { name } => Some(name.as_str()),
        _ => None,
    }
}

/// Name of the nearest enclosing method declaration.
///
/// `None` when `node` sits outside any method, e.g. in a field initializer.
#[must_use]
pub fn enclosing_method_name(tree: &SyntaxTree, node: NodeId) -> Option<&str> {
    match tree.get(enclosing_method(tree, node)?)? {
        Node::MethodDeclaration { name } => Some(name.as_str()),
        _ => None,
    }
}

/// Nearest enclosing method declaration.
#[must_use]
pub fn enclosing_method(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    tree.ancestors(node)
        .find(|id| matches!(tree.get(*id), Some(Node::MethodDeclaration { .. })))
}

/// Nearest enclosing type declaration.
#[must_use]
pub fn enclosing_type(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    tree.ancestors(node)
        .find(|id| matches!(tree.get(*id), Some(Node::ClassDeclaration { .. })))
}

/// Returns true if any watched name is a prefix of `name`.
///
/// Prefix matching also catches typed variants sharing a base name
/// (`GetComponent` matches `GetComponentInChildren`).
#[must_use]
pub fn matches_watched(name: &str, watched: &[&str]) -> bool {
    watched.iter().any(|w| name.starts_with(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTreeBuilder;

    #[test]
    fn name_of_direct_call() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let callee = b.ident("GetComponent");
        let call = b.call(callee);
        let unit = b.unit(&[call]);
        let tree = b.finish(unit);
        assert_eq!(method_name_of(&tree, call), Some("GetComponent"));
    }

    #[test]
    fn name_of_generic_call() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let callee = b.generic("GetComponentInChildren");
        let call = b.call(callee);
        let unit = b.unit(&[call]);
        let tree = b.finish(unit);
        assert_eq!(method_name_of(&tree, call), Some("GetComponentInChildren"));
    }

    #[test]
    fn name_of_qualified_call() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let recv = b.ident("gameObject");
        let name = b.generic("GetComponent");
        let access = b.member(recv, name);
        let call = b.call(access);
        let unit = b.unit(&[call]);
        let tree = b.finish(unit);
        assert_eq!(method_name_of(&tree, call), Some("GetComponent"));
    }

    #[test]
    fn name_of_conditional_call() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let recv = b.ident("target");
        let name = b.ident("GetComponent");
        let bind = b.binding(name);
        let call = b.call(bind);
        let access = b.conditional_access(recv, Some(call));
        let unit = b.unit(&[access]);
        let tree = b.finish(unit);
        assert_eq!(method_name_of(&tree, call), Some("GetComponent"));
    }

    #[test]
    fn name_of_other_shapes_is_none() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let inner_callee = b.ident("MakeDelegate");
        let inner = b.call(inner_callee);
        let call = b.call(inner);
        let not_a_call = b.ident("x");
        let unit = b.unit(&[call, not_a_call]);
        let tree = b.finish(unit);
        assert_eq!(method_name_of(&tree, call), None);
        assert_eq!(method_name_of(&tree, not_a_call), None);
    }

    #[test]
    fn enclosing_method_and_type() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let callee = b.ident("Find");
        let call = b.call(callee);
        let stmt = b.other("expression_statement", &[call]);
        let method = b.method("LateUpdate", &[stmt]);
        let class = b.class("Camera", &[method]);
        let unit = b.unit(&[class]);
        let tree = b.finish(unit);
        assert_eq!(enclosing_method_name(&tree, call), Some("LateUpdate"));
        assert_eq!(enclosing_type(&tree, call), Some(class));
    }

    #[test]
    fn field_initializer_has_no_method() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let callee = b.ident("GetComponent");
        let call = b.call(callee);
        let field = b.other("field_declaration", &[call]);
        let class = b.class("Holder", &[field]);
        let unit = b.unit(&[class]);
        let tree = b.finish(unit);
        assert_eq!(enclosing_method_name(&tree, call), None);
        assert_eq!(enclosing_type(&tree, call), Some(class));
    }

    #[test]
    fn watched_matching_is_prefix_based() {
        let watched = ["GetComponent", "Find"];
        assert!(matches_watched("GetComponentsInParent", &watched));
        assert!(matches_watched("FindWithTag", &watched));
        assert!(!matches_watched("TryGetComponent", &watched));
        assert!(!matches_watched("", &watched));
    }
}
