use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::SubstitutionMode;
use crate::error::{Result, UpdateCommitError};

/// Name of the configuration file looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "update-commit.toml";

/// Name of the configuration file looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".update-commit.toml";

/// Represents the complete configuration for update-commit.
///
/// Contains package identity, packaging file names, and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_package_name() -> String {
    "ti-linux-kernel".to_string()
}

fn default_distribution() -> String {
    "UNRELEASED".to_string()
}

fn default_urgency() -> String {
    "medium".to_string()
}

fn default_maintainer() -> String {
    "Nate Drude <nate.d@variscite.com>".to_string()
}

/// Identity written into new changelog entries.
///
/// `maintainer` is only used by the increment scheme; the variant scheme
/// takes the author from the command line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    #[serde(default = "default_package_name")]
    pub name: String,

    #[serde(default = "default_distribution")]
    pub distribution: String,

    #[serde(default = "default_urgency")]
    pub urgency: String,

    #[serde(default = "default_maintainer")]
    pub maintainer: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            name: default_package_name(),
            distribution: default_distribution(),
            urgency: default_urgency(),
            maintainer: default_maintainer(),
        }
    }
}

fn default_changelog() -> String {
    "changelog".to_string()
}

fn default_rules() -> String {
    "rules".to_string()
}

fn default_control() -> String {
    "control".to_string()
}

/// File names of the packaging files, relative to the debian directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_changelog")]
    pub changelog: String,

    #[serde(default = "default_rules")]
    pub rules: String,

    #[serde(default = "default_control")]
    pub control: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            changelog: default_changelog(),
            rules: default_rules(),
            control: default_control(),
        }
    }
}

/// What to do with a control file that has no maintainer line.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingMaintainer {
    /// Leave the file alone and report a warning
    #[default]
    Warn,
    /// Add the field after the `Source:` line
    Insert,
}

fn default_maintainer_field() -> String {
    "Maintainer:".to_string()
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub substitution: SubstitutionMode,

    #[serde(default)]
    pub missing_maintainer: MissingMaintainer,

    #[serde(default = "default_maintainer_field")]
    pub maintainer_field: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            substitution: SubstitutionMode::default(),
            missing_maintainer: MissingMaintainer::default(),
            maintainer_field: default_maintainer_field(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `update-commit.toml` in current directory
/// 3. `.update-commit.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(path);
    }

    let local = Path::new(LOCAL_CONFIG_FILE);
    if local.exists() {
        return read_config(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join(USER_CONFIG_FILE);
        if user.exists() {
            return read_config(&user);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|e| UpdateCommitError::io(path, e))?;
    toml::from_str(&text).map_err(|e| {
        UpdateCommitError::config(format!("invalid config '{}': {}", path.display(), e))
    })
}
