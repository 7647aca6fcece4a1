use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while updating the packaging files.
/// These are reported to the user but do not change the exit status.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateWarning {
    /// The substitutions did not change the file
    NoChanges { file: PathBuf },
    /// The new changelog entry is already in the changelog
    EntryAlreadyPresent { version: String },
    /// The control file has no maintainer line to rewrite
    MaintainerLineMissing { file: PathBuf, field: String },
    /// The control file had no maintainer line, so one was added
    MaintainerLineInserted { file: PathBuf, field: String },
}

impl fmt::Display for UpdateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateWarning::NoChanges { file } => {
                write!(f, "No changes made to {}", file.display())
            }
            UpdateWarning::EntryAlreadyPresent { version } => {
                write!(f, "Changelog entry for {} already exists", version)
            }
            UpdateWarning::MaintainerLineMissing { file, field } => {
                write!(f, "No '{}' line found in {}", field, file.display())
            }
            UpdateWarning::MaintainerLineInserted { file, field } => {
                write!(f, "No '{}' line found in {}, inserted one", field, file.display())
            }
        }
    }
}
