//! Terminal presentation of analysis results.
//!
//! Everything here is a pure mapping from a normalized result to text;
//! printing is the only side effect. Mood themes, filter keywords, and the
//! Spotify embed rule live in this module so rendering has one home.

use crate::cli::Category;
use crate::history::HistoryEntry;
use crate::model::{AnalysisResult, PlaylistItem};
use colored::{Color, Colorize};
use lazy_static::lazy_static;
use std::collections::HashMap;
use url::Url;

/// Maximum probability bars shown in the breakdown.
const MAX_BREAKDOWN_ROWS: usize = 6;

/// Character width of a probability bar.
const BAR_WIDTH: usize = 20;

/// Character width of the mood banner.
const BANNER_WIDTH: usize = 44;

/// Host recognized for embeddable players.
const SPOTIFY_HOST: &str = "open.spotify.com";

/// Visual theme for one mood: the text color plus the two banner tones that
/// stand in for the background gradient endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodTheme {
    pub color: Color,
    pub banner: (Color, Color),
}

/// Theme used for any label the table doesn't know.
pub const NEUTRAL_THEME: MoodTheme = MoodTheme {
    color: Color::White,
    banner: (Color::BrightBlack, Color::White),
};

lazy_static! {
    static ref THEMES: HashMap<&'static str, MoodTheme> = HashMap::from([
        ("happy", MoodTheme { color: Color::Yellow, banner: (Color::Yellow, Color::BrightYellow) }),
        ("sad", MoodTheme { color: Color::Blue, banner: (Color::Blue, Color::BrightBlue) }),
        ("angry", MoodTheme { color: Color::Red, banner: (Color::Red, Color::BrightRed) }),
        ("neutral", NEUTRAL_THEME),
        ("disgust", MoodTheme { color: Color::Green, banner: (Color::Green, Color::BrightGreen) }),
        ("fear", MoodTheme { color: Color::Magenta, banner: (Color::Magenta, Color::BrightMagenta) }),
        ("surprise", MoodTheme { color: Color::BrightCyan, banner: (Color::Cyan, Color::BrightCyan) }),
        ("excited", MoodTheme { color: Color::BrightYellow, banner: (Color::BrightYellow, Color::BrightRed) }),
        ("calm", MoodTheme { color: Color::Cyan, banner: (Color::Cyan, Color::BrightBlue) }),
        ("romantic", MoodTheme { color: Color::BrightMagenta, banner: (Color::BrightMagenta, Color::Red) }),
        ("lonely", MoodTheme { color: Color::BrightBlue, banner: (Color::BrightBlack, Color::Blue) }),
        ("motivated", MoodTheme { color: Color::BrightRed, banner: (Color::Red, Color::Yellow) }),
    ]);

    /// Fixed keyword sets for the playlist category filter.
    static ref CATEGORY_KEYWORDS: HashMap<Category, &'static [&'static str]> = HashMap::from([
        (
            Category::Focus,
            &["focus", "study", "concentration", "classical", "ambient", "instrumental"][..],
        ),
        (
            Category::Chill,
            &["chill", "lo-fi", "lofi", "relax", "acoustic", "jazz", "mellow"][..],
        ),
        (
            Category::Workout,
            &["workout", "gym", "beast", "pump", "cardio", "power"][..],
        ),
    ]);
}

/// Resolve the theme for a mood label, falling back to the neutral entry.
#[must_use]
pub fn theme_for(label: &str) -> MoodTheme {
    THEMES.get(label).copied().unwrap_or(NEUTRAL_THEME)
}

/// Confidence as a percentage, clamped into [0, 100] whatever the input.
#[must_use]
pub fn confidence_percent(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return 0.0;
    }
    confidence.clamp(0.0, 1.0) * 100.0
}

/// Breakdown rows ready for rendering: values clamped to [0, 1], sorted
/// descending, capped at [`MAX_BREAKDOWN_ROWS`].
#[must_use]
pub fn breakdown_rows(probs: &[(String, f64)]) -> Vec<(String, f64)> {
    let mut rows: Vec<(String, f64)> = probs
        .iter()
        .map(|(label, p)| {
            let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
            (label.clone(), p)
        })
        .collect();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    rows.truncate(MAX_BREAKDOWN_ROWS);
    rows
}

/// Retain the playlist items whose title matches the category's keyword
/// set. `all` performs no filtering.
#[must_use]
pub fn filter_playlist<'a>(items: &'a [PlaylistItem], category: Category) -> Vec<&'a PlaylistItem> {
    let keywords = match CATEGORY_KEYWORDS.get(&category) {
        Some(keywords) => keywords,
        None => return items.iter().collect(),
    };

    items
        .iter()
        .filter(|item| {
            let title = item.title.to_lowercase();
            keywords.iter().any(|keyword| title.contains(keyword))
        })
        .collect()
}

/// Derive an embeddable player URL from a Spotify web player link.
///
/// Recognizes `https://open.spotify.com/<type>/<id>[?query]` and yields
/// `https://open.spotify.com/embed/<type>/<id>`. Anything else (other
/// hosts, too few path segments) yields `None`.
#[must_use]
pub fn spotify_embed_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    if parsed.host_str()? != SPOTIFY_HOST {
        return None;
    }

    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    let kind = segments.next()?;
    let id = segments.next()?;
    Some(format!("https://{SPOTIFY_HOST}/embed/{kind}/{id}"))
}

/// Render a full analysis result: banner, mood line, optional breakdown,
/// and the filtered playlist list.
pub fn render(result: &AnalysisResult, category: Category) {
    let theme = theme_for(&result.mood);

    println!();
    print_banner(theme);
    println!(
        "  {}  {}   {}",
        result.emoji,
        result.mood.to_uppercase().color(theme.color).bold(),
        format!("{:.0}% confident", confidence_percent(result.confidence)).dimmed()
    );
    print_banner(theme);

    // A response without a breakdown renders no breakdown section at all.
    if let Some(probs) = &result.probs {
        render_breakdown(probs);
    }

    render_playlist(&result.playlist, category);
}

/// Render the persisted history, most recent first.
pub fn render_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No history yet. Run `vibe capture`, `vibe analyze`, or `vibe text` first.");
        return;
    }

    for entry in entries {
        let theme = theme_for(&entry.mood);
        let when = entry
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M");
        let title = entry.title.as_deref().unwrap_or("");
        println!(
            "{}  {} {:<10} {:>4.0}%  {:<6} {}",
            when.to_string().dimmed(),
            entry.emoji,
            entry.mood.color(theme.color),
            confidence_percent(entry.confidence),
            format!("[{}]", entry.origin).dimmed(),
            title.dimmed()
        );
    }
}

/// Two-tone rule standing in for the animated mood gradient.
fn print_banner(theme: MoodTheme) {
    let half = "━".repeat(BANNER_WIDTH / 2);
    println!("{}{}", half.color(theme.banner.0), half.color(theme.banner.1));
}

fn render_breakdown(probs: &[(String, f64)]) {
    let rows = breakdown_rows(probs);
    if rows.is_empty() {
        return;
    }

    println!("{}", "Breakdown".bold());
    for (label, p) in rows {
        let filled = (p * BAR_WIDTH as f64).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        println!("  {label:<10} {bar} {:>5.1}%", p * 100.0);
    }
    println!();
}

fn render_playlist(items: &[PlaylistItem], category: Category) {
    let filtered = filter_playlist(items, category);

    if filtered.is_empty() {
        if items.is_empty() {
            println!("{}", "No playlist suggestions returned.".dimmed());
        } else {
            println!(
                "{}",
                format!("No playlists matched the '{category}' filter ({} suggested).", items.len()).dimmed()
            );
        }
        return;
    }

    println!("{}", "Playlists".bold());
    for item in filtered {
        if item.source.is_empty() {
            println!("  • {}", item.title.bold());
        } else {
            println!("  • {} {}", item.title.bold(), format!("({})", item.source).dimmed());
        }
        println!("    {}", item.url.underline());
        if let Some(embed) = spotify_embed_url(&item.url) {
            println!("    {} {}", "embed:".dimmed(), embed);
        }
    }
}
