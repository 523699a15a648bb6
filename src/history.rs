//! Persisted history of past analyses.
//!
//! A single owned [`HistoryLedger`] carries the list through an explicit
//! load/record/save lifecycle. The store is one JSON file in the data
//! directory; anything unreadable there is treated as an empty list, never
//! as a fatal error.

use crate::config;
use crate::model::{AnalysisResult, Origin};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Most entries ever kept; older ones fall off the end.
pub const MAX_ENTRIES: usize = 8;

/// Longest entry title kept before truncation.
const MAX_TITLE_CHARS: usize = 40;

/// One recorded analysis outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub mood: String,
    pub emoji: String,
    pub confidence: f64,
    pub origin: Origin,
    /// Short free-form label, e.g. a snippet of the analyzed text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The capped, persisted result history.
#[derive(Debug)]
pub struct HistoryLedger {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    /// Load the ledger from `path`. A missing or corrupt file loads as an
    /// empty list.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<Vec<HistoryEntry>>(&data) {
                Ok(mut entries) => {
                    entries.truncate(MAX_ENTRIES);
                    entries
                }
                Err(e) => {
                    warn!("Resetting corrupt history at {}: {e}", path.display());
                    Vec::new()
                }
            },
            Err(e) => {
                debug!("No readable history at {} ({e}); starting empty", path.display());
                Vec::new()
            }
        };

        Self { path, entries }
    }

    /// Load the ledger from its default location in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error only when the data directory itself cannot be
    /// resolved or created.
    pub fn open_default() -> Result<Self> {
        Ok(Self::load(config::get_history_path()?))
    }

    /// Prepend a new entry for `result` and drop everything beyond
    /// [`MAX_ENTRIES`].
    pub fn record(&mut self, result: &AnalysisResult, origin: Origin, title: Option<String>) {
        self.entries.insert(
            0,
            HistoryEntry {
                timestamp: Utc::now(),
                mood: result.mood.clone(),
                emoji: result.emoji.clone(),
                confidence: result.confidence,
                origin,
                title,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Write the ledger back to its file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file or its parent directory cannot be
    /// written.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory {}", parent.display())
            })?;
        }

        let data = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize history")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write history to {}", self.path.display()))
    }

    /// Entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Drop every entry. Takes effect on disk after [`HistoryLedger::save`].
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Shorten free text into a history entry title.
#[must_use]
pub fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_TITLE_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();
    format!("{}…", cut.trim_end())
}
