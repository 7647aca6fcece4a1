//! Main workflow orchestration logic
//!
//! Reads the packaging files, derives the next version, computes every new
//! file content in memory and only then writes. Kept apart from `main.rs` so
//! the workflow can be driven without clap.

use std::path::PathBuf;

use crate::clock::Clock;
use crate::config::{Config, MissingMaintainer};
use crate::debian_dir::{self, DebianDir, StagedWrites};
use crate::domain::substitute::{self, insert_field, rewrite_field};
use crate::domain::{prepend_entry, DerivationInput, VersionScheme};
use crate::error::Result;
use crate::warning::UpdateWarning;

/// Arguments for the update workflow
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateArgs {
    pub debian_dir: PathBuf,
    pub kernel_version: String,
    pub commit_id: String,
    pub author: Option<String>,
    pub scheme: VersionScheme,
    /// Compute everything but write nothing
    pub dry_run: bool,
}

/// Outcome of an update
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub old_version: String,
    pub new_version: String,
    /// Files written (or that would be written on a dry run), in write order
    pub updated_files: Vec<PathBuf>,
    pub warnings: Vec<UpdateWarning>,
    pub dry_run: bool,
}

/// Run one update of the debian directory.
///
/// 1. Check the directory (increment scheme only)
/// 2. Derive the new version from the changelog
/// 3. Patch rules and control in memory
/// 4. Prepend the changelog entry
/// 5. Write every changed file, or nothing on any error
pub fn run_update(args: &UpdateArgs, config: &Config, clock: &dyn Clock) -> Result<UpdateReport> {
    let dir = DebianDir::new(&args.debian_dir, &config.files);
    if args.scheme == VersionScheme::Increment {
        dir.check()?;
    }

    let changelog = debian_dir::read(&dir.changelog)?;
    let input = DerivationInput {
        kernel_version: args.kernel_version.clone(),
        commit_id: args.commit_id.clone(),
        author: args.author.clone(),
    };
    let derivation = args
        .scheme
        .derive(&changelog, &input, &config.package, clock.now())?;

    let mode = config.behavior.substitution;
    let mut warnings = Vec::new();
    let mut pending = Vec::new();

    let rules = debian_dir::read(&dir.rules)?;
    let new_rules = substitute::apply(&rules, &derivation.substitutions, mode);
    if new_rules != rules {
        pending.push((dir.rules.clone(), new_rules));
    } else {
        warnings.push(UpdateWarning::NoChanges {
            file: dir.rules.clone(),
        });
    }

    let control = debian_dir::read(&dir.control)?;
    let mut new_control = substitute::apply(&control, &derivation.substitutions, mode);
    if let Some(maintainer) = &derivation.maintainer {
        let field = &config.behavior.maintainer_field;
        new_control = match rewrite_field(&new_control, field, maintainer) {
            Some(rewritten) => rewritten,
            None => match config.behavior.missing_maintainer {
                MissingMaintainer::Warn => {
                    warnings.push(UpdateWarning::MaintainerLineMissing {
                        file: dir.control.clone(),
                        field: field.clone(),
                    });
                    new_control
                }
                MissingMaintainer::Insert => {
                    warnings.push(UpdateWarning::MaintainerLineInserted {
                        file: dir.control.clone(),
                        field: field.clone(),
                    });
                    insert_field(&new_control, field, maintainer)
                }
            },
        };
    }
    if new_control != control {
        pending.push((dir.control.clone(), new_control));
    } else {
        warnings.push(UpdateWarning::NoChanges {
            file: dir.control.clone(),
        });
    }

    match prepend_entry(
        &changelog,
        &derivation.entry,
        derivation.skip_existing_entry,
    ) {
        Some(new_changelog) => pending.push((dir.changelog.clone(), new_changelog)),
        None => warnings.push(UpdateWarning::EntryAlreadyPresent {
            version: derivation.new_version.clone(),
        }),
    }

    let updated_files = if args.dry_run {
        pending.into_iter().map(|(path, _)| path).collect()
    } else {
        let mut writes = StagedWrites::new();
        for (path, contents) in &pending {
            writes.stage(path, contents)?;
        }
        writes.commit()?
    };

    Ok(UpdateReport {
        old_version: derivation.old_version,
        new_version: derivation.new_version,
        updated_files,
        warnings,
        dry_run: args.dry_run,
    })
}
