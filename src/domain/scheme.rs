//! Version derivation strategies.
//!
//! Two incompatible grammars exist for the changelog version of the kernel
//! package. They are kept apart as named strategies:
//!
//! - [`VersionScheme::Increment`]: `<kernel>+<commit>-<revision>`, the Debian
//!   revision is incremented on every update.
//! - [`VersionScheme::Variant`]: `<kernel>-var<N>+<commit>-<revision>`, the
//!   variant counter is incremented (or reset on a kernel bump) and the Debian
//!   revision is preserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::changelog::{ChangelogEntry, LatestEntry, COMMIT_MARKER};
use super::version::{IncrementVersion, VariantVersion};
use crate::config::PackageConfig;
use crate::error::{Result, UpdateCommitError};

/// Which version grammar to derive with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VersionScheme {
    /// `<kernel>+<commit>-<revision>`, revision incremented
    Increment,
    /// `<kernel>-var<N>+<commit>-<revision>`, revision preserved
    Variant,
}

impl fmt::Display for VersionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionScheme::Increment => write!(f, "increment"),
            VersionScheme::Variant => write!(f, "variant"),
        }
    }
}

/// New inputs for one update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationInput {
    pub kernel_version: String,
    pub commit_id: String,
    pub author: Option<String>,
}

/// Literal replacement to apply to the rules and control files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Substitution {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Everything an update needs to write
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub old_version: String,
    pub new_version: String,
    /// Applied in order to both rules and control
    pub substitutions: Vec<Substitution>,
    /// New value of the control file's maintainer field, if it is rewritten
    pub maintainer: Option<String>,
    pub entry: ChangelogEntry,
    /// Skip the changelog entry when it is already present
    pub skip_existing_entry: bool,
}

impl VersionScheme {
    /// Derive the next version from the current changelog contents.
    pub fn derive(
        &self,
        changelog: &str,
        input: &DerivationInput,
        package: &PackageConfig,
        date: DateTime<Utc>,
    ) -> Result<Derivation> {
        let latest = LatestEntry::parse(changelog, &package.name)?;

        match self {
            VersionScheme::Increment => derive_increment(latest, input, package, date),
            VersionScheme::Variant => derive_variant(latest, input, package, date),
        }
    }
}

fn new_entry(
    package: &PackageConfig,
    version: &str,
    commit_id: &str,
    maintainer: &str,
    date: DateTime<Utc>,
) -> ChangelogEntry {
    ChangelogEntry {
        package: package.name.clone(),
        version: version.to_string(),
        distribution: package.distribution.clone(),
        urgency: package.urgency.clone(),
        changes: vec![format!("{} {}", COMMIT_MARKER, commit_id)],
        maintainer: maintainer.to_string(),
        date,
    }
}

fn derive_increment(
    latest: LatestEntry,
    input: &DerivationInput,
    package: &PackageConfig,
    date: DateTime<Utc>,
) -> Result<Derivation> {
    if input.author.is_some() {
        return Err(UpdateCommitError::arguments(
            "the increment scheme does not take an author",
        ));
    }

    let old = IncrementVersion::parse(&latest.version);
    // The previous commit only has to be present; it is not reused.
    latest.commit_id()?;
    let new = old.next(&input.kernel_version, &input.commit_id)?;
    let new_version = new.to_string();

    Ok(Derivation {
        old_version: latest.version,
        entry: new_entry(
            package,
            &new_version,
            &input.commit_id,
            &package.maintainer,
            date,
        ),
        new_version,
        substitutions: vec![Substitution::new(old.kernel_release, new.kernel_release)],
        maintainer: None,
        skip_existing_entry: true,
    })
}

fn derive_variant(
    latest: LatestEntry,
    input: &DerivationInput,
    package: &PackageConfig,
    date: DateTime<Utc>,
) -> Result<Derivation> {
    let author = input
        .author
        .as_deref()
        .ok_or_else(|| UpdateCommitError::arguments("the variant scheme requires an author"))?;

    let old = VariantVersion::parse(&latest.version)?;
    let new = old.next(&input.kernel_version, &input.commit_id)?;
    let new_version = new.to_string();

    // Full version listed first: where both match, the full version wins.
    let mut substitutions = vec![Substitution::new(latest.version.clone(), new_version.clone())];
    if old.kernel_version != new.kernel_version {
        substitutions.push(Substitution::new(old.kernel_version, new.kernel_version));
    }

    Ok(Derivation {
        old_version: latest.version,
        entry: new_entry(package, &new_version, &input.commit_id, author, date),
        new_version,
        substitutions,
        maintainer: Some(author.to_string()),
        skip_existing_entry: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    fn input(kernel: &str, commit: &str, author: Option<&str>) -> DerivationInput {
        DerivationInput {
            kernel_version: kernel.to_string(),
            commit_id: commit.to_string(),
            author: author.map(str::to_string),
        }
    }

    fn derive(scheme: VersionScheme, text: &str, input: DerivationInput) -> Result<Derivation> {
        scheme.derive(text, &input, &PackageConfig::default(), date())
    }

    fn changelog(version: &str, body: &str) -> String {
        format!(
            "ti-linux-kernel ({}) UNRELEASED; urgency=medium\n\n  * {}\n\n -- A <a@b>  Mon, 04 Mar 2024 10:00:00 +0000\n",
            version, body
        )
    }

    #[test]
    fn test_increment_example() {
        let text = changelog("5.10.9-2", "Build based on commit abc123");
        let d = derive(VersionScheme::Increment, &text, input("5.10.9", "def456", None))
            .unwrap();

        assert_eq!(d.old_version, "5.10.9-2");
        assert_eq!(d.new_version, "5.10.9+def456-3");
        assert_eq!(d.substitutions, vec![Substitution::new("5.10.9", "5.10.9+def456")]);
        assert_eq!(d.maintainer, None);
        assert!(d.skip_existing_entry);
        assert_eq!(d.entry.maintainer, PackageConfig::default().maintainer);
        assert_eq!(d.entry.changes, vec!["Build based on commit def456".to_string()]);
    }

    #[test]
    fn test_increment_without_revision() {
        let text = changelog("5.10.9+abc123", "Build based on commit abc123");
        let d = derive(VersionScheme::Increment, &text, input("5.10.10", "fff", None))
            .unwrap();
        assert_eq!(d.new_version, "5.10.10+fff-2");
        assert_eq!(d.substitutions, vec![Substitution::new("5.10.9+abc123", "5.10.10+fff")]);
    }

    #[test]
    fn test_increment_requires_commit_line() {
        let text = changelog("5.10.9-2", "Rebuild");
        let err = derive(VersionScheme::Increment, &text, input("5.10.9", "def456", None))
            .unwrap_err();
        assert!(matches!(err, UpdateCommitError::Parse(_)));
    }

    #[test]
    fn test_increment_rejects_author() {
        let text = changelog("5.10.9-2", "Build based on commit abc123");
        let err = derive(VersionScheme::Increment, &text, input("5.10.9", "x", Some("B <b@c>")))
            .unwrap_err();
        assert!(matches!(err, UpdateCommitError::ArgumentCount(_)));
    }

    #[test]
    fn test_variant_same_kernel() {
        let text = changelog("5.10.9-var3+abc123-1", "Rebuild");
        let d = derive(VersionScheme::Variant, &text, input("5.10.9", "def456", Some("B <b@c>")))
            .unwrap();

        assert_eq!(d.new_version, "5.10.9-var4+def456-1");
        assert_eq!(
            d.substitutions,
            vec![Substitution::new("5.10.9-var3+abc123-1", "5.10.9-var4+def456-1")]
        );
        assert_eq!(d.maintainer.as_deref(), Some("B <b@c>"));
        assert_eq!(d.entry.maintainer, "B <b@c>");
        assert!(!d.skip_existing_entry);
    }

    #[test]
    fn test_variant_kernel_bump() {
        let text = changelog("5.10.9-var3+abc123-1", "Rebuild");
        let d = derive(VersionScheme::Variant, &text, input("6.1.0", "def456", Some("B <b@c>")))
            .unwrap();

        assert_eq!(d.new_version, "6.1.0-var1+def456-1");
        assert_eq!(
            d.substitutions,
            vec![
                Substitution::new("5.10.9-var3+abc123-1", "6.1.0-var1+def456-1"),
                Substitution::new("5.10.9", "6.1.0"),
            ]
        );
    }

    #[test]
    fn test_variant_requires_author() {
        let text = changelog("5.10.9-var3+abc123-1", "Rebuild");
        let err = derive(VersionScheme::Variant, &text, input("5.10.9", "def456", None))
            .unwrap_err();
        assert!(matches!(err, UpdateCommitError::ArgumentCount(_)));
    }

    #[test]
    fn test_schemes_do_not_accept_each_other() {
        let increment = changelog("5.10.9-2", "Build based on commit abc123");
        let result = derive(VersionScheme::Variant, &increment, input("5.10.9", "x", Some("B")));
        assert!(result.is_err());

        let variant = changelog("5.10.9-var3+abc123-1", "Rebuild");
        let result = derive(VersionScheme::Increment, &variant, input("5.10.9", "x", None));
        assert!(result.is_err());
    }

    #[test]
    fn test_scheme_display() {
        assert_eq!(VersionScheme::Increment.to_string(), "increment");
        assert_eq!(VersionScheme::Variant.to_string(), "variant");
    }
}
