//! User interface module - console output.
//!
//! `formatter` holds the formatting functions; this module reports the
//! outcome of a whole update.

pub mod formatter;

pub use formatter::{
    display_error, display_status, display_updated_files, display_version_change, display_warning,
    format_updated_files,
};

use crate::cli::orchestration::UpdateReport;

/// Print warnings, the version change and the list of written files.
pub fn display_report(report: &UpdateReport) {
    display_version_change(&report.old_version, &report.new_version);
    println!();

    for warning in &report.warnings {
        display_warning(warning);
    }

    display_updated_files(&report.updated_files, report.dry_run);
}
