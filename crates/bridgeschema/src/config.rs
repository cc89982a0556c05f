//! `bridgeschema.toml` configuration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "bridgeschema.toml";

/// Platform whose `<name>.<platform>.ts` spec files are combined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize, Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Ios,
    Android,
}

impl TargetPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Ios => "ios",
            TargetPlatform::Android => "android",
        }
    }
}

impl std::fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level configuration.
///
/// Example bridgeschema.toml:
/// ```toml
/// [combine]
/// exclude = "Native(Internal|Legacy)"
/// platform = "ios"
/// pretty = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(default)]
pub struct BridgeschemaConfig {
    pub combine: CombineConfig,
}

/// Settings for `bridgeschema combine`. Command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(default)]
pub struct CombineConfig {
    /// Regex; matching spec file paths are skipped
    pub exclude: Option<String>,
    /// Only combine platform-specific files for this platform
    pub platform: Option<TargetPlatform>,
    /// Pretty-print the output JSON. Default: true
    pub pretty: Option<bool>,
}

impl CombineConfig {
    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or(true)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl BridgeschemaConfig {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicitly named config file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Load `explicit` if given, otherwise `bridgeschema.toml` from `dir` when
    /// it exists, otherwise defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = dir.join(CONFIG_FILE_NAME);
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "loading config");
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}
