//! Semantic symbol model and the host-provided resolver seam.
//!
//! Rules never build symbols themselves. They ask a [`SymbolResolver`]
//! about a node and treat `None` as "does not match".

use crate::syntax::{NodeId, SyntaxTree};

/// What a resolved identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A field.
    Field,
    /// A property.
    Property,
    /// A method.
    Method,
    /// A type.
    Type,
    /// A local variable.
    Local,
    /// A method parameter.
    Parameter,
}

/// A type referred to by name and namespace.
///
/// Types are compared structurally because the interesting base types
/// usually live outside the analyzed code, where no shared identity exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    /// Simple type name (e.g., `MonoBehaviour`).
    pub name: String,
    /// Containing namespace (e.g., `UnityEngine`); `None` for the global namespace.
    pub namespace: Option<String>,
}

impl TypeName {
    /// Creates a type name.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(String::from),
        }
    }

    /// Structural equality against a name and namespace.
    #[must_use]
    pub fn is(&self, name: &str, namespace: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An annotation attached to a declaration, e.g. `[SerializeField]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeMarker {
    /// Attribute class name as it surfaced (`SerializeField` or `SerializeFieldAttribute`).
    pub name: String,
}

impl AttributeMarker {
    /// Creates a marker.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Matches `name` exactly or `name` followed by `suffix`.
    #[must_use]
    pub fn matches(&self, name: &str, suffix: &str) -> bool {
        self.name == name
            || self
                .name
                .strip_prefix(name)
                .is_some_and(|rest| rest == suffix)
    }
}

/// The resolved identity of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol name.
    pub name: String,
    /// Symbol kind.
    pub kind: SymbolKind,
    /// Declaring type; for a type symbol, the enclosing type if nested.
    pub containing_type: Option<TypeName>,
    /// Containing namespace.
    pub namespace: Option<String>,
    /// Base types, nearest first. Only meaningful for [`SymbolKind::Type`].
    /// Ends where the host could not resolve further.
    pub base_types: Vec<TypeName>,
    /// Attribute markers on the declaration.
    pub attributes: Vec<AttributeMarker>,
}

impl Symbol {
    /// Creates a symbol with no containing type, bases, or attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            containing_type: None,
            namespace: None,
            base_types: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Sets the containing type.
    #[must_use]
    pub fn in_type(mut self, containing: TypeName) -> Self {
        self.containing_type = Some(containing);
        self
    }

    /// Sets the namespace.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the base-type chain.
    #[must_use]
    pub fn with_bases(mut self, bases: Vec<TypeName>) -> Self {
        self.base_types = bases;
        self
    }

    /// Adds an attribute marker.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(AttributeMarker::new(name));
        self
    }

    /// For a type symbol, the type itself as a [`TypeName`].
    #[must_use]
    pub fn as_type_name(&self) -> TypeName {
        TypeName {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }

    /// Returns true if this type is, or transitively derives from, `name` in `namespace`.
    ///
    /// Walks the type itself and then its base chain comparing name and
    /// namespace, never identity.
    #[must_use]
    pub fn derives_from(&self, name: &str, namespace: &str) -> bool {
        self.as_type_name().is(name, namespace) || self.base_types.iter().any(|t| t.is(name, namespace))
    }

    /// Returns true for fields and properties.
    #[must_use]
    pub fn is_field_or_property(&self) -> bool {
        matches!(self.kind, SymbolKind::Field | SymbolKind::Property)
    }
}

/// Host-provided semantic queries.
///
/// Both methods may come back empty; callers treat that as a non-match.
pub trait SymbolResolver: Send + Sync {
    /// Resolves what `node` refers to.
    ///
    /// For a call this is the invoked method; for an identifier the
    /// declaration it binds to; for a type declaration the declared type.
    fn resolve(&self, tree: &SyntaxTree, node: NodeId) -> Option<Symbol>;

    /// Attribute markers attached to `symbol`'s declaration.
    fn attributes_of(&self, symbol: &Symbol) -> Vec<AttributeMarker> {
        symbol.attributes.clone()
    }
}

/// A resolver that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl SymbolResolver for NullResolver {
    fn resolve(&self, _tree: &SyntaxTree, _node: NodeId) -> Option<Symbol> {
        None
    }
}

/// A resolver backed by a fixed node-to-symbol table.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    symbols: std::collections::HashMap<NodeId, Symbol>,
}

impl MapResolver {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `node` to `symbol`.
    #[must_use]
    pub fn bind(mut self, node: NodeId, symbol: Symbol) -> Self {
        self.symbols.insert(node, symbol);
        self
    }
}

impl SymbolResolver for MapResolver {
    fn resolve(&self, _tree: &SyntaxTree, node: NodeId) -> Option<Symbol> {
        self.symbols.get(&node).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn behaviour() -> Symbol {
        Symbol::new("Player", SymbolKind::Type)
            .in_namespace("Game")
            .with_bases(vec![
                TypeName::new("MonoBehaviour", Some("UnityEngine")),
                TypeName::new("Behaviour", Some("UnityEngine")),
                TypeName::new("Component", Some("UnityEngine")),
                TypeName::new("Object", Some("UnityEngine")),
            ])
    }

    #[test]
    fn derives_from_walks_chain() {
        let s = behaviour();
        assert!(s.derives_from("MonoBehaviour", "UnityEngine"));
        assert!(s.derives_from("Object", "UnityEngine"));
        assert!(s.derives_from("Player", "Game"));
    }

    #[test]
    fn derives_from_requires_namespace_match() {
        let s = Symbol::new("Player", SymbolKind::Type)
            .with_bases(vec![TypeName::new("MonoBehaviour", Some("MyFramework"))]);
        assert!(!s.derives_from("MonoBehaviour", "UnityEngine"));

        let unresolved = Symbol::new("Player", SymbolKind::Type)
            .with_bases(vec![TypeName::new("MonoBehaviour", None)]);
        assert!(!unresolved.derives_from("MonoBehaviour", "UnityEngine"));
    }

    #[test]
    fn attribute_matches_exact_or_suffixed() {
        let plain = AttributeMarker::new("Inject");
        let suffixed = AttributeMarker::new("InjectAttribute");
        let other = AttributeMarker::new("InjectOptional");
        assert!(plain.matches("Inject", "Attribute"));
        assert!(suffixed.matches("Inject", "Attribute"));
        assert!(!other.matches("Inject", "Attribute"));
    }

    #[test]
    fn type_name_display_is_qualified() {
        assert_eq!(
            TypeName::new("GameObject", Some("UnityEngine")).to_string(),
            "UnityEngine.GameObject"
        );
        assert_eq!(TypeName::new("Helper", None).to_string(), "Helper");
    }

    #[test]
    fn default_attributes_of_reads_symbol() {
        let s = Symbol::new("speed", SymbolKind::Field).with_attribute("SerializeField");
        let attrs = NullResolver.attributes_of(&s);
        assert_eq!(attrs, vec![AttributeMarker::new("SerializeField")]);
    }
}
