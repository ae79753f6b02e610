//! Rule presets.

use crate::{ForbiddenFindMethod, GetComponentOutsideInit, NullGuardRule};
use strict_lint_core::RuleBox;

/// Preset configurations for strict-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every built-in rule.
    All,
    /// Performance rules only (SR0001, SR0002).
    Performance,
    /// Fail-fast rules only (SR0003, SR0004).
    FailFast,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::All => all_rules(),
            Self::Performance => performance_rules(),
            Self::FailFast => vec![Box::new(NullGuardRule::new())],
        }
    }
}

/// Returns the performance rules.
///
/// - `get-component-outside-init` (SR0001)
/// - `forbidden-find-method` (SR0002)
#[must_use]
pub fn performance_rules() -> Vec<RuleBox> {
    vec![
        Box::new(GetComponentOutsideInit::new()),
        Box::new(ForbiddenFindMethod::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(GetComponentOutsideInit::new()),
        Box::new(ForbiddenFindMethod::new()),
        Box::new(NullGuardRule::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::all_descriptors;
    use strict_lint_core::Engine;

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::All.rules().len(), 3);
        assert_eq!(Preset::Performance.rules().len(), 2);
        assert_eq!(Preset::FailFast.rules().len(), 1);
    }

    #[test]
    fn all_rules_cover_the_catalog() {
        let engine = Engine::new().rules(all_rules());
        let ids: Vec<&str> = engine.descriptors().iter().map(|d| d.id).collect();
        let expected: Vec<&str> = all_descriptors().iter().map(|d| d.id).collect();
        assert_eq!(ids, expected);
    }
}
