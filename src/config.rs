//! # Configuration Module
//!
//! This module handles service configuration and data directory setup for
//! Vibe. It provides platform-appropriate storage locations for the history
//! file and derives the inference service endpoints from a single injected
//! base address.
//!
//! ## Data Storage
//!
//! Vibe stores its history in the platform-standard data directory:
//! - Linux: `~/.local/share/vibe/`
//! - macOS: `~/Library/Application Support/vibe/`
//! - Windows: `%APPDATA%\vibe\`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default inference service address, overridable with `--api-url` or the
/// `VIBE_API_URL` environment variable.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// File name of the persisted history list inside the data directory.
pub const HISTORY_FILE: &str = "history.json";

/// Returns the platform-appropriate data directory for Vibe.
///
/// The `vibe` subdirectory is created if it doesn't exist, so callers can
/// write into it directly.
///
/// # Errors
///
/// Returns an error if the system data directory cannot be determined or the
/// subdirectory cannot be created due to permissions.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let vibe_dir = data_dir.join("vibe");
    fs::create_dir_all(&vibe_dir).with_context(|| {
        format!(
            "Failed to create Vibe data directory at {}. Please check file permissions.",
            vibe_dir.display()
        )
    })?;

    Ok(vibe_dir)
}

/// Returns the path of the persisted history file.
///
/// # Errors
///
/// Same failure modes as [`get_data_dir`].
pub fn get_history_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(HISTORY_FILE))
}

/// Inference service endpoints derived from one injected base address.
///
/// This is the single place the service location lives; commands construct
/// one from the CLI flag (or environment) and pass it down, so no module
/// reads an ambient global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ServiceConfig {
    /// Create a configuration for the given base address. A trailing slash
    /// is stripped so endpoint derivation stays uniform.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// `POST` endpoint for free-text prediction.
    #[must_use]
    pub fn text_endpoint(&self) -> String {
        format!("{}/api/predict/text", self.base_url)
    }

    /// `POST` endpoint for batch image prediction.
    #[must_use]
    pub fn images_endpoint(&self) -> String {
        format!("{}/api/predict/images", self.base_url)
    }

    /// `POST` endpoint for single-image prediction, used as the fallback
    /// when the batch endpoint fails.
    #[must_use]
    pub fn image_endpoint(&self) -> String {
        format!("{}/api/predict/image", self.base_url)
    }

    /// Interactive API documentation, linked for reference only.
    #[must_use]
    pub fn docs_url(&self) -> String {
        format!("{}/docs", self.base_url)
    }
}
