use std::path::PathBuf;

use crate::cli::orchestration::UpdateArgs;
use crate::config::Config;
use crate::domain::{SubstitutionMode, VersionScheme};
use crate::error::{Result, UpdateCommitError};

#[derive(clap::Parser, Debug, Clone, PartialEq)]
#[command(
    name = "update-commit",
    version,
    about = "Update Debian packaging metadata for a new upstream kernel commit"
)]
pub struct Args {
    #[arg(help = "Debian packaging directory (containing changelog, rules, control)")]
    pub debian_dir: PathBuf,

    #[arg(help = "Upstream kernel version, e.g. 5.10.9")]
    pub kernel_version: String,

    #[arg(help = "Upstream commit id the package is built from")]
    pub commit_id: String,

    #[arg(help = "Author for the changelog entry and control Maintainer field (variant scheme)")]
    pub author: Option<String>,

    #[arg(
        long,
        value_enum,
        help = "Version scheme [default: increment with 3 arguments, variant with 4]"
    )]
    pub scheme: Option<VersionScheme>,

    #[arg(long, help = "Only substitute inside field values, on whole version tokens")]
    pub strict: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    pub dry_run: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Package name of the changelog entries")]
    pub package: Option<String>,
}

impl Args {
    /// Scheme requested explicitly, or implied by the presence of an author.
    pub fn scheme(&self) -> VersionScheme {
        match (self.scheme, &self.author) {
            (Some(scheme), _) => scheme,
            (None, Some(_)) => VersionScheme::Variant,
            (None, None) => VersionScheme::Increment,
        }
    }

    /// Fold command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(package) = &self.package {
            config.package.name = package.clone();
        }
        if self.strict {
            config.behavior.substitution = SubstitutionMode::Strict;
        }
    }

    /// Build the workflow arguments, checking the argument count against the scheme.
    pub fn update_args(&self) -> Result<UpdateArgs> {
        let scheme = self.scheme();
        let usage = match (scheme, &self.author) {
            (VersionScheme::Variant, None) => {
                Some("the variant scheme expects <debian_directory> <kernel_version> <commit_id> <author>")
            }
            (VersionScheme::Increment, Some(_)) => {
                Some("the increment scheme expects <debian_directory> <kernel_version> <commit_id>")
            }
            _ => None,
        };
        if let Some(usage) = usage {
            return Err(UpdateCommitError::arguments(usage));
        }

        Ok(UpdateArgs {
            debian_dir: self.debian_dir.clone(),
            kernel_version: self.kernel_version.clone(),
            commit_id: self.commit_id.clone(),
            author: self.author.clone(),
            scheme,
            dry_run: self.dry_run,
        })
    }
}
