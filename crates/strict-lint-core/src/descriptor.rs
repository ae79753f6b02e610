//! Static rule descriptors.

use crate::types::Severity;

/// Immutable metadata describing one diagnostic a rule can emit.
///
/// Descriptors are declared as `static` items and never mutated. The
/// `message_format` uses positional placeholders (`{0}`, `{1}`, ...) that
/// are filled from the arguments a rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Stable short code (e.g., "SR0001"). Never renumbered once released.
    pub id: &'static str,
    /// Kebab-case rule name.
    pub name: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Message template with positional placeholders.
    pub message_format: &'static str,
    /// Grouping category.
    pub category: &'static str,
    /// Severity used unless the host overrides it.
    pub default_severity: Severity,
    /// Whether the diagnostic is reported by default.
    pub enabled_by_default: bool,
    /// Longer explanation of the problem.
    pub description: &'static str,
    /// Short remediation hint shown as help text.
    pub help: &'static str,
}

impl RuleDescriptor {
    /// Substitutes `{n}` placeholders with `args[n]`.
    ///
    /// Placeholders without a matching argument are left untouched.
    #[must_use]
    pub fn format_message<S: AsRef<str>>(&self, args: &[S]) -> String {
        let template = self.message_format;
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let replaced = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                let arg = args.get(index)?;
                Some((arg.as_ref(), close))
            });
            match replaced {
                Some((arg, close)) => {
                    out.push_str(arg);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: RuleDescriptor = RuleDescriptor {
        id: "T0001",
        name: "sample",
        title: "Sample",
        message_format: "'{0}' found in '{1}'",
        category: "Test",
        default_severity: Severity::Warning,
        enabled_by_default: true,
        description: "",
        help: "",
    };

    #[test]
    fn fills_positional_placeholders() {
        assert_eq!(
            SAMPLE.format_message(&["GetComponent", "Update"]),
            "'GetComponent' found in 'Update'"
        );
    }

    #[test]
    fn leaves_missing_placeholders_alone() {
        assert_eq!(SAMPLE.format_message(&["Find"]), "'Find' found in '{1}'");
    }

    #[test]
    fn keeps_literal_braces() {
        let d = RuleDescriptor {
            message_format: "use {braces} and {0}",
            ..SAMPLE
        };
        assert_eq!(d.format_message(&["x"]), "use {braces} and x");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        let d = RuleDescriptor {
            message_format: "Null check after GetComponent",
            ..SAMPLE
        };
        let empty: [&str; 0] = [];
        assert_eq!(d.format_message(&empty), "Null check after GetComponent");
    }
}
