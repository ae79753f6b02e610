//! Project-scope filter.
//!
//! Decides from a file path alone whether the file is first-party project
//! code (analyzed) or vendored/external code (skipped). The analyzer's own
//! package is always skipped so it never reports on itself.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Marker segments that drive [`ScopeFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Project source root segment; anything under it is in scope.
    #[serde(default = "default_project_root")]
    pub project_root: String,

    /// Vendored package cache segment; anything under it is out of scope.
    #[serde(default = "default_vendor_cache")]
    pub vendor_cache: String,

    /// Embedded package root segment.
    #[serde(default = "default_package_root")]
    pub package_root: String,

    /// This analyzer's own package directory name.
    #[serde(default = "default_self_package")]
    pub self_package: String,

    /// Package name prefixes treated as first-party (e.g., `com.example.`).
    #[serde(default)]
    pub first_party_packages: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            vendor_cache: default_vendor_cache(),
            package_root: default_package_root(),
            self_package: default_self_package(),
            first_party_packages: Vec::new(),
        }
    }
}

fn default_project_root() -> String {
    "Assets".to_string()
}

fn default_vendor_cache() -> String {
    "PackageCache".to_string()
}

fn default_package_root() -> String {
    "Packages".to_string()
}

fn default_self_package() -> String {
    "com.strict-lint.analyzers".to_string()
}

/// Compiled scope policy. Built once, shared read-only.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    project_root: String,
    vendor_cache: String,
    package_root: String,
    self_package: String,
    first_party: Vec<String>,
}

impl Default for ScopeFilter {
    fn default() -> Self {
        Self::new(&ScopeConfig::default())
    }
}

impl ScopeFilter {
    /// Compiles a filter from its configuration.
    #[must_use]
    pub fn new(config: &ScopeConfig) -> Self {
        Self {
            project_root: segment(&config.project_root),
            vendor_cache: segment(&config.vendor_cache),
            package_root: segment(&config.package_root),
            self_package: segment(&config.self_package),
            first_party: config
                .first_party_packages
                .iter()
                .map(|p| p.trim_matches(|c| c == '/' || c == '\\'))
                .filter(|p| !p.is_empty())
                .map(|p| format!("/{p}"))
                .collect(),
        }
    }

    /// Returns true if the file at `path` is first-party project code.
    #[must_use]
    pub fn is_project_code(&self, path: &Path) -> bool {
        let Some(raw) = path.to_str() else {
            return false;
        };
        self.is_project_path(raw)
    }

    /// String form of [`Self::is_project_code`].
    #[must_use]
    pub fn is_project_path(&self, raw: &str) -> bool {
        if raw.trim().is_empty() {
            return false;
        }

        let mut path = raw.replace('\\', "/");
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        if contains(&path, &self.project_root) {
            return true;
        }

        if contains(&path, &self.vendor_cache) {
            return false;
        }

        if contains(&path, &self.package_root) {
            if contains(&path, &self.self_package) {
                return false;
            }
            return self.first_party.iter().any(|prefix| path.contains(prefix.as_str()));
        }

        false
    }
}

/// Normalizes a marker into `/name/` form; empty markers never match.
fn segment(name: &str) -> String {
    let trimmed = name.trim_matches(|c| c == '/' || c == '\\');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}/", trimmed.replace('\\', "/"))
    }
}

fn contains(path: &str, marker: &str) -> bool {
    !marker.is_empty() && path.contains(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ScopeFilter {
        ScopeFilter::new(&ScopeConfig {
            first_party_packages: vec!["com.example.".to_string(), "com.studio.".to_string()],
            ..ScopeConfig::default()
        })
    }

    #[test]
    fn empty_path_is_out_of_scope() {
        assert!(!filter().is_project_path(""));
        assert!(!filter().is_project_code(Path::new("")));
    }

    #[test]
    fn assets_is_in_scope() {
        assert!(filter().is_project_path("/home/dev/Game/Assets/Scripts/Player.cs"));
    }

    #[test]
    fn assets_wins_over_package_root() {
        assert!(filter().is_project_path("/Game/Packages/com.vendor.tool/Assets/X.cs"));
    }

    #[test]
    fn assets_wins_over_self_package() {
        assert!(filter().is_project_path(
            "/Game/Packages/com.strict-lint.analyzers/Assets/X.cs"
        ));
    }

    #[test]
    fn package_cache_is_out_of_scope() {
        assert!(!filter().is_project_path(
            "/Game/Library/PackageCache/com.unity.inputsystem@1.7.0/Runtime/Input.cs"
        ));
    }

    #[test]
    fn own_package_is_never_in_scope() {
        assert!(!filter().is_project_path(
            "/Game/Packages/com.strict-lint.analyzers/Editor/Sample.cs"
        ));
    }

    #[test]
    fn first_party_package_is_in_scope() {
        assert!(filter().is_project_path("/Game/Packages/com.example.core/Runtime/Service.cs"));
        assert!(filter().is_project_path("/Game/Packages/com.studio.ui/Runtime/View.cs"));
    }

    #[test]
    fn third_party_package_is_out_of_scope() {
        assert!(!filter().is_project_path("/Game/Packages/com.unity.textmeshpro/Scripts/TMP.cs"));
        assert!(!filter().is_project_path("/Game/Packages/jp.hadashikick.vcontainer/Runtime/Di.cs"));
    }

    #[test]
    fn other_locations_are_out_of_scope() {
        assert!(!filter().is_project_path("/Game/Editor/Tools/Build.cs"));
        assert!(!filter().is_project_path("/tmp/scratch.cs"));
    }

    #[test]
    fn windows_separators_are_normalized() {
        assert!(filter().is_project_path(r"C:\Users\dev\Game\Assets\Scripts\Enemy.cs"));
        assert!(!filter().is_project_path(r"C:\Game\Library\PackageCache\x\y.cs"));
    }

    #[test]
    fn relative_paths_are_anchored() {
        assert!(filter().is_project_path("Assets/Scripts/Player.cs"));
        assert!(filter().is_project_path("Packages/com.example.core/Runtime/A.cs"));
    }

    #[test]
    fn marker_must_be_a_whole_segment() {
        assert!(!filter().is_project_path("/Game/MyAssets/Player.cs"));
        assert!(!filter().is_project_path("/Game/AssetsBackup/Player.cs"));
    }

    #[test]
    fn prefixes_without_package_root_do_not_count() {
        assert!(!filter().is_project_path("/src/com.example.core/Service.cs"));
    }

    #[test]
    fn default_has_no_first_party_packages() {
        let filter = ScopeFilter::default();
        assert!(!filter.is_project_path("/Game/Packages/com.example.core/A.cs"));
        assert!(filter.is_project_path("/Game/Assets/A.cs"));
    }
}
