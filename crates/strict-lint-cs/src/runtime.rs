//! Built-in model of the Unity runtime types rules care about.
//!
//! Only the inheritance spine of the component model and the methods the
//! rules look for are listed. Anything else resolves to nothing, which
//! rules treat as "no match".

use strict_lint_core::{Symbol, SymbolKind, TypeName};

/// Namespace of the Unity runtime.
pub const NAMESPACE: &str = "UnityEngine";

/// A runtime type with its direct base and declared methods.
#[derive(Debug)]
pub struct RuntimeType {
    /// Simple name.
    pub name: &'static str,
    /// Direct base, `None` for `Object`.
    pub base: Option<&'static str>,
    /// Methods declared (not inherited) by this type.
    pub methods: &'static [&'static str],
}

const COMPONENT_METHODS: &[&str] = &[
    "GetComponent",
    "GetComponents",
    "GetComponentInChildren",
    "GetComponentsInChildren",
    "GetComponentInParent",
    "GetComponentsInParent",
    "TryGetComponent",
    "CompareTag",
];

static TYPES: &[RuntimeType] = &[
    RuntimeType {
        name: "Object",
        base: None,
        methods: &[
            "FindObjectOfType",
            "FindObjectsOfType",
            "FindAnyObjectByType",
            "FindObjectsByType",
            "FindFirstObjectByType",
            "Instantiate",
            "Destroy",
            "DestroyImmediate",
            "DontDestroyOnLoad",
        ],
    },
    RuntimeType {
        name: "GameObject",
        base: Some("Object"),
        methods: &[
            "Find",
            "FindWithTag",
            "FindGameObjectWithTag",
            "FindGameObjectsWithTag",
            "GetComponent",
            "GetComponents",
            "GetComponentInChildren",
            "GetComponentsInChildren",
            "GetComponentInParent",
            "GetComponentsInParent",
            "TryGetComponent",
            "AddComponent",
            "SetActive",
            "CompareTag",
        ],
    },
    RuntimeType {
        name: "Component",
        base: Some("Object"),
        methods: COMPONENT_METHODS,
    },
    RuntimeType {
        name: "Transform",
        base: Some("Component"),
        methods: &["Find", "GetChild", "SetParent", "LookAt", "Translate", "Rotate"],
    },
    RuntimeType {
        name: "Rigidbody",
        base: Some("Component"),
        methods: &["AddForce", "MovePosition", "MoveRotation"],
    },
    RuntimeType {
        name: "Behaviour",
        base: Some("Component"),
        methods: &[],
    },
    RuntimeType {
        name: "Camera",
        base: Some("Behaviour"),
        methods: &["ScreenToWorldPoint", "WorldToScreenPoint", "ScreenPointToRay"],
    },
    RuntimeType {
        name: "MonoBehaviour",
        base: Some("Behaviour"),
        methods: &[
            "StartCoroutine",
            "StopCoroutine",
            "StopAllCoroutines",
            "Invoke",
            "InvokeRepeating",
            "CancelInvoke",
        ],
    },
    RuntimeType {
        name: "ScriptableObject",
        base: Some("Object"),
        methods: &["CreateInstance"],
    },
];

/// Looks up a runtime type by simple name.
#[must_use]
pub fn find_type(name: &str) -> Option<&'static RuntimeType> {
    TYPES.iter().find(|t| t.name == name)
}

/// Base chain of `name`, nearest first, excluding `name` itself.
#[must_use]
pub fn base_chain(name: &str) -> Vec<TypeName> {
    let mut chain = Vec::new();
    let mut current = find_type(name).and_then(|t| t.base);
    while let Some(base) = current {
        chain.push(TypeName::new(base, Some(NAMESPACE)));
        current = find_type(base).and_then(|t| t.base);
    }
    chain
}

/// Resolves `method` on runtime type `owner`, walking inherited members.
///
/// The returned symbol's containing type is the type that declares the
/// method, so `GameObject.FindObjectOfType` resolves into `Object`.
#[must_use]
pub fn find_method(owner: &str, method: &str) -> Option<Symbol> {
    let mut current = find_type(owner);
    while let Some(ty) = current {
        if ty.methods.iter().any(|m| *m == method) {
            return Some(
                Symbol::new(method, SymbolKind::Method)
                    .in_type(TypeName::new(ty.name, Some(NAMESPACE)))
                    .in_namespace(NAMESPACE),
            );
        }
        current = ty.base.and_then(find_type);
    }
    None
}
