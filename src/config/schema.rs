//! Raw stamping settings as a host (or a TOML settings file) supplies them.
//!
//! Every key is optional; absent keys fall back to the documented defaults.
//! Nothing here is compiled - pattern and format compilation happens in the
//! resolver, where a bad value degrades a single field instead of failing
//! the load.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FILENAME_PATTERN: &str = ".*";
pub const DEFAULT_LINE_LIMIT: i64 = 5;
pub const DEFAULT_BIRTH_TIME_START: &str = "[cC]reated *: ";
pub const DEFAULT_BIRTH_TIME_END: &str = "$";
pub const DEFAULT_MODIFIED_TIME_START: &str = "[lL]ast[ -][mM]odified *: ";
pub const DEFAULT_MODIFIED_TIME_END: &str = "$";
pub const DEFAULT_FORMAT: &str = "yyyy/MM/dd HH:mm:ss";
pub const DEFAULT_TEX_PLACEHOLDER: &str = "XXX-DATE-WHEN-CREATED-XXX";
pub const DEFAULT_TEX_FORMAT: &str = "'\\DTMdate{'yyyy-MM-dd'}'";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Documents whose file name does not match are ignored entirely
    pub filename_pattern: String,
    /// Signed window size: positive scans from the top, non-positive scans
    /// `|limit|` lines from the bottom
    pub line_limit: i64,
    pub birth_time_start: String,
    pub birth_time_end: String,
    pub modified_time_start: String,
    pub modified_time_end: String,
    /// Shared token format for birth and modified stamps; empty selects
    /// the ISO-8601 fallback
    pub format: String,
    /// Appended verbatim after birth and modified stamps. `None` means
    /// `" by <current user>"`, resolved at compile time.
    pub suffix: Option<String>,
    pub tex_placeholder: String,
    pub tex_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filename_pattern: DEFAULT_FILENAME_PATTERN.to_string(),
            line_limit: DEFAULT_LINE_LIMIT,
            birth_time_start: DEFAULT_BIRTH_TIME_START.to_string(),
            birth_time_end: DEFAULT_BIRTH_TIME_END.to_string(),
            modified_time_start: DEFAULT_MODIFIED_TIME_START.to_string(),
            modified_time_end: DEFAULT_MODIFIED_TIME_END.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            suffix: None,
            tex_placeholder: DEFAULT_TEX_PLACEHOLDER.to_string(),
            tex_format: DEFAULT_TEX_FORMAT.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML{}: {source}", path_suffix(.path))]
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" ({})", path.display()),
        None => String::new(),
    }
}

pub fn load_from_str(input: &str) -> Result<Settings, ConfigError> {
    toml_edit::de::from_str(input).map_err(|source| ConfigError::Toml { path: None, source })
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| match error {
        ConfigError::Toml { path: None, source } => ConfigError::Toml {
            path: Some(path.to_path_buf()),
            source,
        },
        other => other,
    })
}
