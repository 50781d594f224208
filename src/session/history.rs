//! Recency history of selected sessions.
//!
//! One session name per line, most recent first. Reads deduplicate (keeping
//! the first, most recent, occurrence); writes put the new selection on top
//! and truncate to the configured limit. Nothing here is fatal: history only
//! biases ordering.
//!
//! Each write rewrites the whole file (temp file + rename) rather than appending.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// File-backed history store.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
    limit: usize,
}

impl History {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit: limit.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load history entries, most recent first.
    ///
    /// A missing or unreadable file yields an empty history.
    pub fn load(&self) -> Vec<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let mut entries = dedup_first(contents.lines());
                entries.truncate(self.limit);
                entries
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable history");
                Vec::new()
            }
        }
    }

    /// Record `name` as the most recent selection.
    pub fn record(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }

        let mut entries = vec![name.to_string()];
        entries.extend(self.load().into_iter().filter(|entry| entry != name));
        entries.truncate(self.limit);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        // Write-then-rename so a concurrent reader never sees a partial file
        let tmp = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)
            .with_context(|| format!("Failed to write history file: {}", tmp.display()))?;
        for entry in &entries {
            writeln!(file, "{entry}")
                .with_context(|| format!("Failed to write history file: {}", tmp.display()))?;
        }
        file.sync_all().ok();
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace history file: {}", self.path.display()))?;

        Ok(())
    }
}

/// Trim and deduplicate lines, keeping the first occurrence of each name.
pub fn dedup_first<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in lines {
        let name = line.trim();
        if name.is_empty() || entries.iter().any(|e| e == name) {
            continue;
        }
        entries.push(name.to_string());
    }
    entries
}
