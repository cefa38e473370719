// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Recent queries, newest first, stored as a JSON array of strings.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    path: PathBuf,
    limit: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::at_path(crate::get_config_root().join("search_history.json"))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&self.path).context("Failed to read search_history.json")?;
        serde_json::from_str(&content).context("Failed to parse search_history.json")
    }

    pub fn save(&self, entries: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create history directory")?;
            }
        }
        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize history")?;
        fs::write(&self.path, content).context("Failed to write search_history.json")
    }

    /// Puts `query` at the front unless it repeats the newest entry, then
    /// trims to the limit.
    pub fn record(&self, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        let mut entries = self.load()?;
        if query.is_empty() || entries.first().map(String::as_str) == Some(query) {
            return Ok(entries);
        }
        entries.insert(0, query.to_string());
        entries.truncate(self.limit);
        self.save(&entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove search_history.json")?;
        }
        Ok(())
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryManager::at_path(dir.path().join("search_history.json"));
        assert!(history.load().unwrap().is_empty());
        history.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_history.json");
        fs::write(&path, "{not json").unwrap();
        assert!(HistoryManager::at_path(path).load().is_err());
    }
}
