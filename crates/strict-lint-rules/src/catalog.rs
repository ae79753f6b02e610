//! Diagnostic catalog.
//!
//! Every diagnostic the built-in rules can emit is declared here once.
//! Ids are stable and are never renumbered.

use strict_lint_core::{RuleDescriptor, Severity};

/// Category shared by every built-in diagnostic.
pub const CATEGORY: &str = "Unity.StrictRules";

/// SR0001: component acquisition outside `Awake`/`Start`.
pub static GET_COMPONENT_OUTSIDE_INIT: RuleDescriptor = RuleDescriptor {
    id: "SR0001",
    name: "get-component-outside-init",
    title: "GetComponent Outside Awake/Start",
    message_format: "'{0}' is only allowed in Awake or Start. Found in '{1}'. Use cached field or DI instead.",
    category: CATEGORY,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "GetComponent-family calls are only allowed in Awake or Start. Calling them from \
                  Update and friends allocates every frame and hurts performance badly.",
    help: "cache the component in a field during Awake/Start, or inject it",
};

/// SR0002: scene-wide `Find*` lookups in per-frame methods.
pub static FORBIDDEN_FIND_METHOD: RuleDescriptor = RuleDescriptor {
    id: "SR0002",
    name: "forbidden-find-method",
    title: "Forbidden Find Method",
    message_format: "'{0}' is forbidden. Use DI (VContainer) or SerializeField instead.",
    category: CATEGORY,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Find-family methods scan the whole scene, and string-based lookups are brittle. \
                  Resolve references through dependency injection or serialized fields.",
    help: "resolve the reference once through DI or a [SerializeField] field",
};

/// SR0003: null guard over a component acquisition.
pub static NULL_GUARD_AFTER_GET_COMPONENT: RuleDescriptor = RuleDescriptor {
    id: "SR0003",
    name: "null-guard-after-get-component",
    title: "Null Guard After GetComponent",
    message_format: "Null check after GetComponent violates Fail-Fast principle. Use [RequireComponent] and access directly.",
    category: CATEGORY,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "A null check after GetComponent hides a wiring mistake. A missing required \
                  component should fail immediately; declare it with [RequireComponent].",
    help: "add [RequireComponent] to the class and drop the null check",
};

/// SR0004: null guard over an injected or serialized member.
pub static NULL_GUARD_AFTER_INJECTION: RuleDescriptor = RuleDescriptor {
    id: "SR0004",
    name: "null-guard-after-injection",
    title: "Null Guard After DI Injection",
    message_format: "Null check after DI injection ([Inject] or [SerializeField]) violates Fail-Fast principle.",
    category: CATEGORY,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "The container guarantees injected dependencies. An unset dependency is a \
                  design error and should crash at once; fallback paths breed bugs.",
    help: "remove the null check and let a missing dependency fail fast",
};

/// Every built-in descriptor, ordered by id.
#[must_use]
pub fn all_descriptors() -> [&'static RuleDescriptor; 4] {
    [
        &GET_COMPONENT_OUTSIDE_INIT,
        &FORBIDDEN_FIND_METHOD,
        &NULL_GUARD_AFTER_GET_COMPONENT,
        &NULL_GUARD_AFTER_INJECTION,
    ]
}

/// Looks a descriptor up by id.
#[must_use]
pub fn descriptor(id: &str) -> Option<&'static RuleDescriptor> {
    all_descriptors().into_iter().find(|d| d.id == id)
}
