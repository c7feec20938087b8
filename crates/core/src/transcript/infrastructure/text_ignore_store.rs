use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::transcript::domain::ignore_list::IgnoreList;

#[derive(Error, Debug)]
pub enum IgnoreStoreError {
    #[error("failed to read ignore-word file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write ignore-word file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Persists the ignore list as one word per line.
///
/// Entries are trimmed on load and blank lines are skipped. The store is a
/// plain text file so researchers can edit it by hand.
pub struct TextIgnoreStore {
    path: PathBuf,
}

impl TextIgnoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform-specific default location:
    ///
    /// - Linux: `~/.config/turnscribe/ignored-words.txt`
    /// - macOS: `~/Library/Application Support/turnscribe/ignored-words.txt`
    /// - Windows: `%APPDATA%\turnscribe\ignored-words.txt`
    pub fn at_default_path() -> Result<Self, IgnoreStoreError> {
        let dir = dirs::config_dir().ok_or(IgnoreStoreError::NoConfigDir)?;
        Ok(Self::new(dir.join("turnscribe").join("ignored-words.txt")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<IgnoreList, IgnoreStoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| IgnoreStoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(IgnoreList::from_entries(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        ))
    }

    /// Like [`load`](Self::load), but an unreadable or missing file becomes
    /// an empty list. Parsing must proceed without ignore-matching rather
    /// than fail the whole run.
    pub fn load_or_default(&self) -> IgnoreList {
        match self.load() {
            Ok(list) => list,
            Err(e) => {
                log::warn!("ignore list unavailable, continuing without it: {e}");
                IgnoreList::new()
            }
        }
    }

    pub fn save(&self, list: &IgnoreList) -> Result<(), IgnoreStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| IgnoreStoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }
        let mut contents = list.entries().join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        fs::write(&self.path, contents).map_err(|e| IgnoreStoreError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}
