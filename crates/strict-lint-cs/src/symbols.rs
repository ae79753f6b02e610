//! File-local symbol table and the resolver built on it.
//!
//! Resolution is limited to what one file declares plus the built-in
//! runtime model. A base type declared in another file stays unresolved,
//! so the chain of a class deriving from it ends there.

use std::collections::{BTreeMap, HashSet};

use strict_lint_core::query::{enclosing_method, enclosing_type, simple_name};
use strict_lint_core::{Node, NodeId, Symbol, SymbolKind, SymbolResolver, SyntaxTree, TypeName};

use crate::runtime::{self, RuntimeType};

/// Upper bound on base-chain walks; guards against cyclic declarations.
const MAX_DEPTH: usize = 32;

/// A field or property declared by a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Member name.
    pub name: String,
    /// [`SymbolKind::Field`] or [`SymbolKind::Property`].
    pub kind: SymbolKind,
    /// Attribute class names as written, without namespace or arguments.
    pub attributes: Vec<String>,
}

/// A class, struct or record declared in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassInfo {
    /// Simple name.
    pub name: String,
    /// Enclosing namespace.
    pub namespace: Option<String>,
    /// First entry of the base list, as written.
    pub base: Option<String>,
    /// Fields and properties.
    pub members: Vec<MemberInfo>,
    /// Declared method names.
    pub methods: Vec<String>,
}

/// Names declared inside one method body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodInfo {
    /// Parameters, including those of lambdas and local functions.
    pub parameters: HashSet<String>,
    /// Local variables.
    pub locals: HashSet<String>,
    /// Local functions.
    pub local_functions: HashSet<String>,
}

/// Declarations collected while lowering one file.
#[derive(Debug, Clone, Default)]
pub struct FileModel {
    /// Namespaces imported with `using`.
    pub usings: Vec<String>,
    /// `using Alias = Target;` pairs.
    pub aliases: BTreeMap<String, String>,
    /// Classes by declaration node.
    pub classes: BTreeMap<NodeId, ClassInfo>,
    /// Method bodies by declaration node.
    pub methods: BTreeMap<NodeId, MethodInfo>,
}

enum TypeRef<'a> {
    Local(&'a ClassInfo),
    Runtime(&'static RuntimeType),
}

/// Answers symbol queries for one file.
#[derive(Debug, Clone)]
pub struct FileResolver {
    model: FileModel,
}

impl FileResolver {
    /// Creates a resolver over `model`.
    #[must_use]
    pub fn new(model: FileModel) -> Self {
        Self { model }
    }

    fn runtime_visible(&self) -> bool {
        self.model.usings.iter().any(|u| u == runtime::NAMESPACE)
    }

    fn lookup_type(&self, raw: &str) -> Option<TypeRef<'_>> {
        let raw = normalize_type(raw);
        if let Some(target) = self.model.aliases.get(raw) {
            return self.lookup_qualified(normalize_type(target));
        }
        if raw.contains('.') {
            return self.lookup_qualified(raw);
        }

        if let Some(local) = self.model.classes.values().find(|c| c.name == raw) {
            return Some(TypeRef::Local(local));
        }
        if self.runtime_visible() {
            return runtime::find_type(raw).map(TypeRef::Runtime);
        }
        None
    }

    fn lookup_qualified(&self, qualified: &str) -> Option<TypeRef<'_>> {
        let Some((namespace, name)) = qualified.rsplit_once('.') else {
            return self
                .model
                .classes
                .values()
                .find(|c| c.name == qualified)
                .map(TypeRef::Local);
        };
        if namespace == runtime::NAMESPACE {
            return runtime::find_type(name).map(TypeRef::Runtime);
        }
        self.model
            .classes
            .values()
            .find(|c| c.name == name && c.namespace.as_deref() == Some(namespace))
            .map(TypeRef::Local)
    }

    fn base_chain(&self, class: &ClassInfo) -> Vec<TypeName> {
        let mut chain = Vec::new();
        let mut current = class.base.as_deref();

        while let Some(raw) = current {
            if chain.len() >= MAX_DEPTH {
                break;
            }
            match self.lookup_type(raw) {
                Some(TypeRef::Local(base)) => {
                    chain.push(TypeName::new(&base.name, base.namespace.as_deref()));
                    current = base.base.as_deref();
                }
                Some(TypeRef::Runtime(base)) => {
                    chain.push(TypeName::new(base.name, Some(runtime::NAMESPACE)));
                    chain.extend(runtime::base_chain(base.name));
                    break;
                }
                None => {
                    let simple = normalize_type(raw).rsplit('.').next().unwrap_or(raw);
                    chain.push(TypeName::new(simple, None));
                    break;
                }
            }
        }
        chain
    }

    fn type_symbol(&self, class: &ClassInfo) -> Symbol {
        let mut symbol = Symbol::new(&class.name, SymbolKind::Type).with_bases(self.base_chain(class));
        symbol.namespace.clone_from(&class.namespace);
        symbol
    }

    fn method_in(&self, class: &ClassInfo, method: &str) -> Option<Symbol> {
        let mut current = class;
        for _ in 0..MAX_DEPTH {
            if current.methods.iter().any(|m| m == method) {
                return Some(user_symbol(current, method, SymbolKind::Method));
            }
            match self.lookup_type(current.base.as_deref()?)? {
                TypeRef::Local(base) => current = base,
                TypeRef::Runtime(base) => return runtime::find_method(base.name, method),
            }
        }
        None
    }

    fn member_in(&self, class: &ClassInfo, name: &str) -> Option<Symbol> {
        let mut current = class;
        for _ in 0..MAX_DEPTH {
            if let Some(member) = current.members.iter().find(|m| m.name == name) {
                let mut symbol = user_symbol(current, name, member.kind);
                for attr in &member.attributes {
                    symbol = symbol.with_attribute(attr);
                }
                return Some(symbol);
            }
            match self.lookup_type(current.base.as_deref()?)? {
                TypeRef::Local(base) => current = base,
                TypeRef::Runtime(_) => return None,
            }
        }
        None
    }

    fn class_around(&self, tree: &SyntaxTree, node: NodeId) -> Option<&ClassInfo> {
        self.model.classes.get(&enclosing_type(tree, node)?)
    }

    fn resolve_call(&self, tree: &SyntaxTree, call: NodeId, callee: NodeId) -> Option<Symbol> {
        match tree.get(callee)? {
            Node::Identifier { name } | Node::GenericName { name } => {
                let class = self.class_around(tree, call)?;
                let shadowed = enclosing_method(tree, call)
                    .and_then(|m| self.model.methods.get(&m))
                    .is_some_and(|info| info.local_functions.contains(name));
                if shadowed {
                    return Some(user_symbol(class, name, SymbolKind::Method));
                }
                self.method_in(class, name)
            }
            Node::MemberAccess { receiver, name } => {
                let method = simple_name(tree, *name)?;
                if let Some(Node::Identifier { name: owner }) = tree.get(*receiver) {
                    // A variable named like a type hides the type.
                    if self.resolve_identifier(tree, *receiver, owner).is_some() {
                        return None;
                    }
                }
                let owner = qualified_text(tree, *receiver)?;
                match self.lookup_type(&owner)? {
                    TypeRef::Local(class) => self.method_in(class, method),
                    TypeRef::Runtime(ty) => runtime::find_method(ty.name, method),
                }
            }
            _ => None,
        }
    }

    fn resolve_identifier(&self, tree: &SyntaxTree, node: NodeId, name: &str) -> Option<Symbol> {
        if let Some(parent) = tree.parent(node) {
            match tree.get(parent)? {
                Node::MemberAccess { receiver, name: member } if *member == node => {
                    let on_this = matches!(
                        tree.get(*receiver),
                        Some(Node::Other { kind }) if kind == "this_expression" || kind == "this"
                    );
                    if !on_this {
                        return None;
                    }
                    let class = self.class_around(tree, node)?;
                    return self.member_in(class, name);
                }
                Node::MemberBinding { .. } => return None,
                _ => {}
            }
        }

        if let Some(info) = enclosing_method(tree, node).and_then(|m| self.model.methods.get(&m)) {
            if info.parameters.contains(name) {
                return Some(Symbol::new(name, SymbolKind::Parameter));
            }
            if info.locals.contains(name) {
                return Some(Symbol::new(name, SymbolKind::Local));
            }
        }

        let class = self.class_around(tree, node)?;
        self.member_in(class, name)
    }
}

impl SymbolResolver for FileResolver {
    fn resolve(&self, tree: &SyntaxTree, node: NodeId) -> Option<Symbol> {
        match tree.get(node)? {
            Node::ClassDeclaration { .. } => {
                self.model.classes.get(&node).map(|c| self.type_symbol(c))
            }
            Node::Invocation { callee } => self.resolve_call(tree, node, *callee),
            Node::Identifier { name } => self.resolve_identifier(tree, node, name),
            _ => None,
        }
    }
}

fn user_symbol(class: &ClassInfo, name: &str, kind: SymbolKind) -> Symbol {
    let mut symbol =
        Symbol::new(name, kind).in_type(TypeName::new(&class.name, class.namespace.as_deref()));
    symbol.namespace.clone_from(&class.namespace);
    symbol
}

/// Strips `global::` and generic arguments.
fn normalize_type(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = raw.strip_prefix("global::").unwrap_or(raw);
    raw.split('<').next().unwrap_or(raw).trim()
}

/// Dotted text of an identifier or a chain of member accesses over identifiers.
fn qualified_text(tree: &SyntaxTree, node: NodeId) -> Option<String> {
    match tree.get(node)? {
        Node::Identifier { name } | Node::GenericName { name } => Some(name.clone()),
        Node::MemberAccess { receiver, name } => {
            let head = qualified_text(tree, *receiver)?;
            Some(format!("{head}.{}", simple_name(tree, *name)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strict_lint_core::SyntaxTreeBuilder;

    fn class(name: &str, namespace: Option<&str>, base: Option<&str>) -> ClassInfo {
        ClassInfo {
            name: name.to_string(),
            namespace: namespace.map(String::from),
            base: base.map(String::from),
            ..ClassInfo::default()
        }
    }

    #[test]
    fn chain_walks_local_then_runtime() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let base = b.class("EnemyBase", &[]);
        let derived = b.class("Boss", &[]);
        let unit = b.unit(&[base, derived]);
        let tree = b.finish(unit);

        let mut model = FileModel {
            usings: vec!["UnityEngine".to_string()],
            ..FileModel::default()
        };
        model.classes.insert(base, class("EnemyBase", Some("Game"), Some("MonoBehaviour")));
        model.classes.insert(derived, class("Boss", Some("Game"), Some("EnemyBase")));
        let resolver = FileResolver::new(model);

        let symbol = resolver.resolve(&tree, derived).expect("type symbol");
        assert_eq!(symbol.namespace.as_deref(), Some("Game"));
        assert!(symbol.derives_from("EnemyBase", "Game"));
        assert!(symbol.derives_from("MonoBehaviour", "UnityEngine"));
        assert!(symbol.derives_from("Object", "UnityEngine"));
    }

    #[test]
    fn runtime_types_need_an_import() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let decl = b.class("Player", &[]);
        let tree = b.finish(decl);

        let mut model = FileModel::default();
        model.classes.insert(decl, class("Player", None, Some("MonoBehaviour")));
        let symbol = FileResolver::new(model).resolve(&tree, decl).expect("type symbol");
        assert!(!symbol.derives_from("MonoBehaviour", "UnityEngine"));
        assert_eq!(symbol.base_types, vec![TypeName::new("MonoBehaviour", None)]);

        let mut model = FileModel::default();
        model.classes.insert(decl, class("Player", None, Some("UnityEngine.MonoBehaviour")));
        let symbol = FileResolver::new(model).resolve(&tree, decl).expect("type symbol");
        assert!(symbol.derives_from("MonoBehaviour", "UnityEngine"));
    }

    #[test]
    fn cyclic_bases_terminate() {
        let mut b = SyntaxTreeBuilder::new("a.cs");
        let first = b.class("A", &[]);
        let second = b.class("B", &[]);
        let unit = b.unit(&[first, second]);
        let tree = b.finish(unit);

        let mut model = FileModel::default();
        model.classes.insert(first, class("A", None, Some("B")));
        model.classes.insert(second, class("B", None, Some("A")));
        let symbol = FileResolver::new(model).resolve(&tree, first).expect("type symbol");
        assert_eq!(symbol.base_types.len(), MAX_DEPTH);
    }

    #[test]
    fn normalizes_type_text() {
        assert_eq!(normalize_type(" global::UnityEngine.Object "), "UnityEngine.Object");
        assert_eq!(normalize_type("Singleton<GameManager>"), "Singleton");
    }
}
