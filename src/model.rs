//! Normalized analysis results and the static mood lookup tables.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Glyph used when neither the service nor the table knows the label.
pub const NEUTRAL_EMOJI: &str = "🙂";

/// Where an analysis request originated from.
///
/// Recorded alongside every history entry so past results can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Webcam still(s)
    Camera,
    /// Image file(s) from disk
    Upload,
    /// Free text
    Text,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Camera => write!(f, "camera"),
            Origin::Upload => write!(f, "upload"),
            Origin::Text => write!(f, "text"),
        }
    }
}

/// A recommended playlist entry, sourced entirely from the service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub title: String,
    /// Provider name, e.g. "spotify"
    #[serde(default)]
    pub source: String,
    pub url: String,
    /// Optional cover image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// A fully normalized prediction, immutable once built.
///
/// Produced by [`crate::client`] from whatever the service returned; every
/// field has already been defaulted, so rendering code never needs to guess.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Lowercased mood label, `neutral` when the service omitted one
    pub mood: String,
    pub emoji: String,
    /// Classifier certainty for the top label; defaulted to 0 when missing
    pub confidence: f64,
    /// Per-label probabilities sorted descending, `None` when the service
    /// sent no breakdown at all
    pub probs: Option<Vec<(String, f64)>>,
    pub playlist: Vec<PlaylistItem>,
}

lazy_static! {
    /// Label → emoji table covering the labels the classifier is known to
    /// emit, core emotions plus the extended text-derived moods.
    static ref EMOJI: HashMap<&'static str, &'static str> = HashMap::from([
        ("happy", "😄"),
        ("sad", "😢"),
        ("angry", "😠"),
        ("neutral", "😐"),
        ("disgust", "🤢"),
        ("fear", "😨"),
        ("surprise", "😲"),
        ("excited", "🤩"),
        ("calm", "😌"),
        ("romantic", "😍"),
        ("lonely", "😔"),
        ("motivated", "💪"),
        ("energetic", "⚡"),
        ("study", "📚"),
        ("gaming", "🎮"),
        ("karaoke", "🎤"),
    ]);
}

/// Resolve the emoji for a mood label, falling back to the neutral glyph.
#[must_use]
pub fn emoji_for(label: &str) -> &'static str {
    EMOJI.get(label).copied().unwrap_or(NEUTRAL_EMOJI)
}
