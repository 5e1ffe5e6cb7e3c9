//! File-backed cache for facts that are too slow to compute on every prompt.
//!
//! Entries are JSON values keyed by repository path, stored together in a
//! single `cache.json` under the shprompt home directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct Cache {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
    dirty: bool,
}

impl Cache {
    /// Loads the cache from the default location.
    pub fn load() -> Self {
        Self::load_from(&crate::config::paths::cache_path())
    }

    /// Loads the cache at `path`.
    ///
    /// A missing or unreadable file yields an empty cache; the prompt must
    /// render even when the cache is broken.
    pub fn load_from(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "discarding corrupt cache");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            entries,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for `key`, or `None` on a miss or a shape mismatch.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::debug!(key, error = %err, "cache entry has unexpected shape");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("serialize cache entry for {key}"))?;
        self.entries.insert(key.to_string(), value);
        self.dirty = true;
        Ok(())
    }

    /// Writes the cache back if anything changed.
    /// Uses atomic write (temp file + rename) so a concurrent prompt never
    /// reads a half-written file.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize cache")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write cache to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        self.dirty = false;
        Ok(())
    }

    /// Drops every entry and removes the file.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.dirty = false;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}
