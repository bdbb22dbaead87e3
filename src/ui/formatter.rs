//! Pure formatting functions for UI output.
//!
//! Status lines go to stderr so that stdout carries only the machine-readable
//! result of a phase (a version, a reference, a layout).

use console::style;

use crate::domain::{BranchMatch, BranchName};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Describe how a branch was classified.
pub fn format_branch_match(branch: &BranchName, matched: &BranchMatch) -> String {
    format!(
        "Branch '{}' matched rule '{}': version {}, dependency {}",
        branch, matched.rule, matched.version, matched.constraint
    )
}

/// Print how a branch was classified.
pub fn display_branch_match(branch: &BranchName, matched: &BranchMatch) {
    display_status(&format_branch_match(branch, matched));
}
