//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_NAME: &str = "strict-lint.toml";

const DEFAULT_CONFIG: &str = r#"# strict-lint configuration

# Lowest severity that makes `strict-lint check` exit with status 1
fail_on = "warning"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "."

# Glob patterns to exclude from analysis
exclude = [
    "**/Library/**",
    "**/Temp/**",
    "**/obj/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

# Which files count as project code. Paths under `project_root` are always
# analyzed; packages are analyzed only when first-party.
[scope]
project_root = "Assets"
vendor_cache = "PackageCache"
package_root = "Packages"
self_package = "com.strict-lint.analyzers"
# first_party_packages = ["com.example."]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_NAME), force)?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to match your project layout");
    println!("  2. Run: strict-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
