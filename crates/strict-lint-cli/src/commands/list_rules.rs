//! List rules command implementation.

use strict_lint_rules::catalog::all_descriptors;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<32} {:<9} Title", "Code", "Name", "Severity");
    println!("{}", "-".repeat(90));

    for descriptor in all_descriptors() {
        println!(
            "{:<8} {:<32} {:<9} {}",
            descriptor.id,
            descriptor.name,
            descriptor.default_severity.to_string(),
            descriptor.title
        );
    }

    println!("\nPresets:");
    println!("  all          - SR0001, SR0002, SR0003, SR0004 (default)");
    println!("  performance  - SR0001, SR0002");
    println!("  fail-fast    - SR0003, SR0004");

    println!("\nSelect a preset with --preset, e.g.:");
    println!("  strict-lint check --preset performance");
}
