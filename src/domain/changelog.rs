//! Reading the latest entry of a `debian/changelog` and writing new ones.

use crate::clock::format_changelog_date;
use crate::error::{Result, UpdateCommitError};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;

/// Marker preceding the upstream commit id in an entry body
pub const COMMIT_MARKER: &str = "Build based on commit";

/// The most recent entry of a changelog: its version and body lines.
///
/// The body runs from the line after the header up to the next line that
/// starts with the package name (the header of the previous release).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestEntry {
    pub version: String,
    pub body: Vec<String>,
}

impl LatestEntry {
    /// Find the first line beginning with `package` and extract `package (VERSION)`.
    pub fn parse(content: &str, package: &str) -> Result<Self> {
        let header_pattern = format!(r"^{} \(([^)]+)\)", regex::escape(package));
        let header = Regex::new(&header_pattern)
            .map_err(|e| UpdateCommitError::parse(format!("Invalid package name: {}", e)))?;

        let mut lines = content.lines();
        let header_line = lines
            .by_ref()
            .find(|line| line.starts_with(package))
            .ok_or_else(|| {
                UpdateCommitError::parse(format!(
                    "No '{}' entry found in changelog",
                    package
                ))
            })?;

        let version = header
            .captures(header_line)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                UpdateCommitError::parse(format!(
                    "Unable to parse version from changelog line '{}'",
                    header_line
                ))
            })?;

        let body = lines
            .take_while(|line| !line.starts_with(package))
            .map(str::to_string)
            .collect();

        Ok(LatestEntry { version, body })
    }

    /// Commit id recorded by a `Build based on commit <id>` line.
    pub fn commit_id(&self) -> Result<String> {
        let line = self
            .body
            .iter()
            .find(|line| line.contains(COMMIT_MARKER))
            .ok_or_else(|| {
                UpdateCommitError::parse("Unable to find old commit ID in changelog")
            })?;

        Regex::new(&format!(r"{} (\w+)", COMMIT_MARKER))
            .ok()
            .and_then(|re| re.captures(line))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                UpdateCommitError::parse(format!(
                    "Unable to parse old commit ID from changelog line '{}'",
                    line.trim()
                ))
            })
    }
}

/// A single release entry.
///
/// ```text
/// package (version) distribution; urgency=urgency
///
///   * change
///
///  -- maintainer name <email>  date
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogEntry {
    pub package: String,
    pub version: String,
    pub distribution: String,
    pub urgency: String,
    pub changes: Vec<String>,
    pub maintainer: String,
    pub date: DateTime<Utc>,
}

impl fmt::Display for ChangelogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {}; urgency={}\n\n",
            self.package, self.version, self.distribution, self.urgency
        )?;
        for change in &self.changes {
            writeln!(f, "  * {}", change)?;
        }
        write!(
            f,
            "\n -- {}  {}\n\n",
            self.maintainer,
            format_changelog_date(&self.date)
        )
    }
}

/// Prepend `entry` to `content`.
///
/// With `skip_existing`, returns `None` when the entry text (ignoring
/// surrounding whitespace) is already present.
pub fn prepend_entry(content: &str, entry: &ChangelogEntry, skip_existing: bool) -> Option<String> {
    let rendered = entry.to_string();
    if skip_existing && content.contains(rendered.trim()) {
        return None;
    }
    Some(rendered + content)
}
