use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, ImportResult};

/// Settings for an import run, usually read from `databridge.toml`.
///
/// Every key is optional in the file; missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Directory holding one subdirectory per object kind.
    pub data_root: PathBuf,
    /// Directory of the filesystem document store.
    pub store_root: PathBuf,
    /// Directory of `.xmd` form definitions.
    pub forms_root: PathBuf,
    /// Object file extensions, matched case-insensitively without the dot.
    pub extensions: Vec<String>,
    /// Merge objects but never write to the store.
    pub dry_run: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            store_root: PathBuf::from("store"),
            forms_root: PathBuf::from("forms"),
            extensions: vec!["xml".to_string()],
            dry_run: false,
        }
    }
}

impl ImportConfig {
    /// Read a TOML configuration file.
    pub fn load(path: &Path) -> ImportResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ImportResult<Self> {
        toml::from_str(text).map_err(|err| ImportError::Config(err.to_string()))
    }

    pub fn to_toml(&self) -> ImportResult<String> {
        toml::to_string_pretty(self).map_err(|err| ImportError::Config(err.to_string()))
    }

    /// Whether `path` has one of the configured object extensions.
    pub fn recognizes(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
