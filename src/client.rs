//! # Analysis Client Module
//!
//! This module talks to the mood inference service over HTTP and turns its
//! responses into [`AnalysisResult`] values the rest of the application can
//! rely on. Three request shapes exist, selected by input origin:
//!
//! - Free text: JSON `POST /api/predict/text`
//! - One or more images: multipart `POST /api/predict/images`, all files
//!   under one shared field name
//! - Fallback: multipart `POST /api/predict/image` with a single file,
//!   attempted exactly once when the batch endpoint fails
//!
//! ## Design Decision: blocking client
//!
//! Requests here are strictly sequential (one prediction per command), so
//! the blocking `reqwest` client keeps the call sites plain functions with
//! no runtime to carry around. No request timeout is configured: a slow
//! service keeps the command waiting rather than discarding a capture that
//! already happened.
//!
//! ## Normalization
//!
//! Malformed or partial responses are never rejected wholesale. Every field
//! is defaulted on its own: missing mood becomes `neutral`, missing emoji is
//! resolved from the static table, non-numeric confidence becomes 0, a
//! malformed playlist becomes an empty list, and the probability breakdown
//! stays optional.

use crate::config::ServiceConfig;
use crate::model::{emoji_for, AnalysisResult, PlaylistItem};
use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

/// Shared multipart field name for the batch endpoint.
const BATCH_FIELD: &str = "files";

/// Field name for the single-image fallback endpoint.
const SINGLE_FIELD: &str = "file";

/// Raw response shape. Everything is optional; normalization fills the gaps.
#[derive(Debug, Default, Deserialize)]
struct RawPrediction {
    #[serde(default)]
    mood: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default)]
    confidence: Option<Value>,
    #[serde(default)]
    playlist: Option<Value>,
    #[serde(default)]
    probs: Option<Value>,
}

/// Client for the mood inference service.
pub struct AnalysisClient {
    http: Client,
    config: ServiceConfig,
}

impl AnalysisClient {
    /// Create a client for the given service configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let http = Client::builder()
            .user_agent(concat!("vibe/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http, config }
    }

    /// Submit free text for sentiment-based mood prediction.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable response body.
    pub fn predict_text(&self, text: &str) -> Result<AnalysisResult> {
        let endpoint = self.config.text_endpoint();
        debug!("POST {endpoint} ({} chars)", text.len());

        let response = self
            .http
            .post(endpoint)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .context("Failed to reach the mood service")?;

        decode(response)
    }

    /// Submit one or more encoded images for facial-expression prediction.
    ///
    /// Tries the batch endpoint first with every frame. If that fails for
    /// any reason (transport or server error), exactly one fallback request
    /// is made to the single-image endpoint using only the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error when `frames` is empty or when both attempts fail.
    pub fn predict_images(&self, frames: &[Vec<u8>]) -> Result<AnalysisResult> {
        anyhow::ensure!(!frames.is_empty(), "No frames to submit");

        match self.post_batch(frames) {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Batch endpoint failed ({e:#}); retrying single-image endpoint with the first frame");
                self.post_single(&frames[0])
                    .context("Single-image fallback also failed")
            }
        }
    }

    fn post_batch(&self, frames: &[Vec<u8>]) -> Result<AnalysisResult> {
        let endpoint = self.config.images_endpoint();
        debug!("POST {endpoint} ({} frames)", frames.len());

        let mut form = Form::new();
        for (i, jpeg) in frames.iter().enumerate() {
            let part = Part::bytes(jpeg.clone())
                .file_name(format!("frame-{i}.jpg"))
                .mime_str("image/jpeg")
                .context("Failed to build multipart body")?;
            form = form.part(BATCH_FIELD, part);
        }

        let response = self
            .http
            .post(endpoint)
            .multipart(form)
            .send()
            .context("Failed to reach the mood service")?;

        decode(response)
    }

    fn post_single(&self, jpeg: &[u8]) -> Result<AnalysisResult> {
        let endpoint = self.config.image_endpoint();
        debug!("POST {endpoint} (1 frame)");

        let part = Part::bytes(jpeg.to_vec())
            .file_name("frame-0.jpg")
            .mime_str("image/jpeg")
            .context("Failed to build multipart body")?;
        let form = Form::new().part(SINGLE_FIELD, part);

        let response = self
            .http
            .post(endpoint)
            .multipart(form)
            .send()
            .context("Failed to reach the mood service")?;

        decode(response)
    }
}

/// Returns the trimmed text, or `None` when there is nothing to submit.
///
/// Empty input never produces a request, so blank submissions leave every
/// bit of state untouched.
#[must_use]
pub fn prepared_text(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Check the status, parse the body, and normalize it.
fn decode(response: Response) -> Result<AnalysisResult> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        anyhow::bail!("Mood service returned {status}: {}", body.trim());
    }

    let raw: RawPrediction = response
        .json()
        .context("Failed to parse mood service response")?;
    Ok(normalize(raw))
}

/// Field-by-field defaulting of a raw response into an [`AnalysisResult`].
fn normalize(raw: RawPrediction) -> AnalysisResult {
    let mood = raw
        .mood
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "neutral".to_string());

    let emoji = raw
        .emoji
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| emoji_for(&mood).to_string());

    let confidence = raw.confidence.as_ref().and_then(coerce_number).unwrap_or(0.0);
    let playlist = raw.playlist.map(normalize_playlist).unwrap_or_default();
    let probs = raw.probs.map(normalize_probs);

    AnalysisResult {
        mood,
        emoji,
        confidence,
        probs,
        playlist,
    }
}

/// Coerce a JSON value to a number, accepting numeric strings.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A playlist that fails to deserialize becomes an empty list.
fn normalize_playlist(value: Value) -> Vec<PlaylistItem> {
    match serde_json::from_value(value) {
        Ok(items) => items,
        Err(e) => {
            warn!("Ignoring malformed playlist in response: {e}");
            Vec::new()
        }
    }
}

/// Turn a `label -> probability` object into pairs sorted descending,
/// dropping entries whose value cannot be coerced to a number.
fn normalize_probs(value: Value) -> Vec<(String, f64)> {
    let map = match value {
        Value::Object(map) => map,
        _ => {
            warn!("Ignoring malformed probability breakdown in response");
            return Vec::new();
        }
    };

    let mut probs: Vec<(String, f64)> = map
        .into_iter()
        .filter_map(|(label, v)| coerce_number(&v).map(|p| (label.to_lowercase(), p)))
        .collect();
    probs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    probs
}
