//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic. Errors and warnings
//! go to stderr, everything else to stdout.

use std::path::PathBuf;

use console::style;

use crate::warning::UpdateWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal warning.
pub fn display_warning(warning: &UpdateWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the version change computed from the changelog.
///
/// # Arguments
/// * `old_version` - Version of the latest changelog entry
/// * `new_version` - Version of the entry being added
pub fn display_version_change(old_version: &str, new_version: &str) {
    println!("\n{}", style("Version Change:").bold());
    println!("  From: {}", style(old_version).red());
    println!("  To:   {}", style(new_version).green());
}

/// Lines listing the files an update wrote (or would write).
pub fn format_updated_files(files: &[PathBuf], dry_run: bool) -> Vec<String> {
    if files.is_empty() {
        return vec!["No files were updated.".to_string()];
    }

    let heading = if dry_run {
        "Would update the following files:"
    } else {
        "Successfully updated the following files:"
    };

    std::iter::once(heading.to_string())
        .chain(files.iter().map(|f| format!("- {}", f.display())))
        .collect()
}

/// Display the list of updated files.
pub fn display_updated_files(files: &[PathBuf], dry_run: bool) {
    for line in format_updated_files(files, dry_run) {
        println!("{}", line);
    }
}
