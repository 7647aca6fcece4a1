use crate::error::{Result, UpdateCommitError};
use regex::Regex;
use std::fmt;

/// Debian revision assumed when a version carries no `-` suffix
pub const IMPLICIT_DEBIAN_REVISION: &str = "1";

/// Version in the increment scheme: `<kernel_release>[-<debian_revision>]`
///
/// The kernel release is everything before the last `-`. A version without
/// any `-` has an implicit Debian revision of `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementVersion {
    pub kernel_release: String,
    debian_revision: Option<String>,
}

impl IncrementVersion {
    /// Build a version with an explicit Debian revision
    pub fn new(kernel_release: impl Into<String>, debian_revision: impl Into<String>) -> Self {
        IncrementVersion {
            kernel_release: kernel_release.into(),
            debian_revision: Some(debian_revision.into()),
        }
    }

    /// Split a version string on its last `-`
    pub fn parse(version: &str) -> Self {
        match version.rsplit_once('-') {
            Some((release, revision)) => IncrementVersion {
                kernel_release: release.to_string(),
                debian_revision: Some(revision.to_string()),
            },
            None => IncrementVersion {
                kernel_release: version.to_string(),
                debian_revision: None,
            },
        }
    }

    /// The Debian revision, falling back to the implicit `1`
    pub fn debian_revision(&self) -> &str {
        self.debian_revision
            .as_deref()
            .unwrap_or(IMPLICIT_DEBIAN_REVISION)
    }

    /// Numeric value of the Debian revision
    pub fn revision_number(&self) -> Result<u64> {
        let revision = self.debian_revision();
        if revision.is_empty() || !revision.chars().all(|c| c.is_ascii_digit()) {
            return Err(UpdateCommitError::parse(format!(
                "Unable to parse Debian revision number '{}'",
                revision
            )));
        }
        revision.parse::<u64>().map_err(|_| {
            UpdateCommitError::parse(format!("Debian revision '{}' is out of range", revision))
        })
    }

    /// Next version: `<kernel_version>+<commit_id>-<revision + 1>`
    pub fn next(&self, kernel_version: &str, commit_id: &str) -> Result<Self> {
        let current = self.revision_number()?;
        let revision = current.checked_add(1).ok_or_else(|| {
            UpdateCommitError::parse(format!(
                "Debian revision '{}' cannot be incremented: out of range",
                current
            ))
        })?;
        Ok(IncrementVersion::new(
            format!("{}+{}", kernel_version, commit_id),
            revision.to_string(),
        ))
    }
}

impl fmt::Display for IncrementVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.debian_revision {
            Some(revision) => write!(f, "{}-{}", self.kernel_release, revision),
            None => write!(f, "{}", self.kernel_release),
        }
    }
}

const VARIANT_PATTERN: &str = r"^([^-]+)-var([0-9]+)\+([^-]+)-(.+)$";

/// Version in the variant-counter scheme:
/// `<kernel_version>-var<var_number>+<commit_id>-<debian_revision>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantVersion {
    pub kernel_version: String,
    pub var_number: u32,
    pub commit_id: String,
    pub debian_revision: String,
}

impl VariantVersion {
    pub fn parse(version: &str) -> Result<Self> {
        let captures = Regex::new(VARIANT_PATTERN)
            .ok()
            .and_then(|re| re.captures(version))
            .ok_or_else(|| {
                UpdateCommitError::parse(format!(
                    "Version '{}' does not match <kernel>-var<N>+<commit>-<revision>",
                    version
                ))
            })?;

        let digits = &captures[2];
        // A leading zero would not survive reassembly.
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(UpdateCommitError::parse(format!(
                "Variant number '{}' in '{}' has a leading zero",
                digits, version
            )));
        }
        let var_number = digits.parse::<u32>().map_err(|_| {
            UpdateCommitError::parse(format!("Variant number '{}' is out of range", digits))
        })?;

        Ok(VariantVersion {
            kernel_version: captures[1].to_string(),
            var_number,
            commit_id: captures[3].to_string(),
            debian_revision: captures[4].to_string(),
        })
    }

    /// Next version for a kernel/commit pair.
    ///
    /// The variant counter increments while the kernel version is unchanged
    /// and restarts at 1 on a kernel bump. The Debian revision is carried over.
    pub fn next(&self, kernel_version: &str, commit_id: &str) -> Result<Self> {
        let var_number = if kernel_version == self.kernel_version {
            self.var_number.checked_add(1).ok_or_else(|| {
                UpdateCommitError::parse(format!(
                    "Variant number '{}' cannot be incremented: out of range",
                    self.var_number
                ))
            })?
        } else {
            1
        };

        Ok(VariantVersion {
            kernel_version: kernel_version.to_string(),
            var_number,
            commit_id: commit_id.to_string(),
            debian_revision: self.debian_revision.clone(),
        })
    }
}

impl fmt::Display for VariantVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-var{}+{}-{}",
            self.kernel_version, self.var_number, self.commit_id, self.debian_revision
        )
    }
}
