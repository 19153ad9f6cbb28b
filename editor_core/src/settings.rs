//! User settings for the editing commands.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Which editor's multi-cursor conventions to follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeEditor {
    #[default]
    VsCode,
    Sublime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Continue markdown lists when inserting a line next to a list item.
    pub auto_insert_list_prefix: bool,
    pub emulate: CodeEditor,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_insert_list_prefix: true,
            emulate: CodeEditor::VsCode,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file. A missing file yields `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(settings))
    }
}
