//! TOML configuration parser for folders.toml.

use std::path::{Path, PathBuf};

use bevy_folders::TreeConfig;
use serde::Deserialize;
use thiserror::Error;

/// What to do when a reload finds the stored hierarchy out of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDrift {
    /// Write the healed hierarchy back immediately (default)
    #[default]
    Rewrite,
    /// Leave the file untouched until the next explicit persist
    Keep,
}

/// Parsed store configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Hierarchy JSON file, resolved against the config file's directory
    /// when loaded through [`StoreConfig::from_file`].
    pub hierarchy_file: PathBuf,
    pub on_drift: OnDrift,
    pub tree: TreeConfig,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStoreConfig {
    /// Defaults to "hierarchy.json"
    hierarchy_file: Option<String>,
    /// "rewrite" (default) or "keep"
    on_drift: Option<String>,
    #[serde(default)]
    tree: TreeConfig,
}

const DEFAULT_HIERARCHY_FILE: &str = "hierarchy.json";

impl StoreConfig {
    /// Parse from a TOML file. A relative `hierarchy_file` is resolved
    /// against the directory holding `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StoreConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_str(&content)?;
        if config.hierarchy_file.is_relative()
            && let Some(dir) = path.parent()
        {
            config.hierarchy_file = dir.join(&config.hierarchy_file);
        }
        Ok(config)
    }

    /// Parse from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StoreConfigError> {
        let raw: RawStoreConfig =
            toml::from_str(content).map_err(|e| StoreConfigError::Parse(e.to_string()))?;

        let on_drift = match raw.on_drift.as_deref() {
            None | Some("rewrite") => OnDrift::Rewrite,
            Some("keep") => OnDrift::Keep,
            Some(other) => {
                return Err(StoreConfigError::Validation(format!(
                    "invalid on_drift value '{other}': expected 'rewrite' or 'keep'"
                )));
            }
        };

        let hierarchy_file = raw
            .hierarchy_file
            .unwrap_or_else(|| DEFAULT_HIERARCHY_FILE.to_string());
        if hierarchy_file.trim().is_empty() {
            return Err(StoreConfigError::Validation(
                "hierarchy_file must not be empty".into(),
            ));
        }

        Ok(Self {
            hierarchy_file: PathBuf::from(hierarchy_file),
            on_drift,
            tree: raw.tree,
        })
    }
}

/// Errors during config parsing.
#[derive(Debug, Error)]
pub enum StoreConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}
