//! # Vibe - Mood Detection & Playlist Suggestions
//!
//! Vibe reads your mood from a webcam still, a photo, or a line of text and
//! suggests playlists to match. Classification happens on a separate
//! inference service; this binary captures, submits, renders, and remembers.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `camera`: Webcam acquisition via V4L2
//! - `encoder`: Still-frame JPEG encoding and burst capture
//! - `client`: Inference service client and response normalization
//! - `present`: Terminal rendering of results
//! - `history`: Persisted history of past analyses
//! - `config`: Service address and data directory management
//!
//! ## Usage
//!
//! ```bash
//! # Read your mood from the webcam
//! vibe capture
//!
//! # Analyze a photo
//! vibe analyze selfie.jpg
//!
//! # Analyze how you say you feel
//! vibe text "long week, need to unwind" --category chill
//!
//! # See what you've been feeling lately
//! vibe history
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::info;
use std::fs;

use vibe::cli::{self, Category};
use vibe::client::{self, AnalysisClient};
use vibe::config::ServiceConfig;
use vibe::history::{self, HistoryLedger};
use vibe::model::{AnalysisResult, Origin};
use vibe::{camera, completion, encoder, present};

/// Main entry point for the Vibe application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the appropriate module functions. All operations return Results for
/// consistent error handling throughout the application.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug vibe capture` - Enable debug logging
/// - `RUST_LOG=vibe::client=trace vibe text "..."` - Module-specific logging
fn main() -> Result<()> {
    // Initialize environment logger for debugging and monitoring
    env_logger::init();

    // Parse command-line arguments using Clap derive macros
    let args = cli::Args::parse();
    let service = ServiceConfig::new(&args.api_url);

    // Route commands to appropriate module functions
    match args.command {
        cli::Command::Capture { device, frames, category } => {
            info!("Capturing {frames} frame(s) from /dev/video{device}");

            let mut session = camera::CameraSession::open(device).map_err(|e| {
                eprintln!("Failed to open the camera:");
                eprintln!("  {e:#}");
                eprintln!();
                eprintln!("This error typically means:");
                eprintln!("  1. No webcam is connected");
                eprintln!("  2. Another application is using the camera");
                eprintln!("  3. Your user lacks permission on the video device (video group)");
                eprintln!();
                eprintln!("You can still analyze a photo: vibe analyze <file>");
                e
            })?;

            let (width, height) = session.resolution();
            println!("Capturing {frames} still(s) at {width}x{height}...");

            let stills = encoder::capture_burst(&mut session, frames)?;
            session.close();

            let result = request_prediction(&service, |client| client.predict_images(&stills))?;
            finish(&result, Origin::Camera, None, category)?;
        }
        cli::Command::Analyze { files, category } => {
            let mut images = Vec::with_capacity(files.len());
            for path in &files {
                let data = fs::read(path)
                    .with_context(|| format!("Failed to read image file {}", path.display()))?;
                images.push(data);
            }
            info!("Analyzing {} image file(s)", images.len());

            let result = request_prediction(&service, |client| client.predict_images(&images))?;
            finish(&result, Origin::Upload, None, category)?;
        }
        cli::Command::Text { text, category } => {
            match client::prepared_text(&text) {
                None => {
                    // Blank input: no request, nothing recorded.
                    println!("Nothing to analyze: the text is empty.");
                }
                Some(trimmed) => {
                    info!("Analyzing text ({} chars)", trimmed.len());
                    let title = Some(history::snippet(trimmed));
                    let result =
                        request_prediction(&service, |client| client.predict_text(trimmed))?;
                    finish(&result, Origin::Text, title, category)?;
                }
            }
        }
        cli::Command::History { clear } => {
            let mut ledger = HistoryLedger::open_default()?;
            if clear {
                ledger.clear();
                ledger.save()?;
                println!("History cleared");
            } else {
                present::render_history(ledger.entries());
            }
        }
        cli::Command::Docs => {
            println!("Service documentation: {}", service.docs_url());
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}

/// Run one prediction request with user-facing hints on failure.
///
/// Prior state is untouched when this fails: the history is only written
/// after a successful prediction.
fn request_prediction<F>(service: &ServiceConfig, request: F) -> Result<AnalysisResult>
where
    F: FnOnce(&AnalysisClient) -> Result<AnalysisResult>,
{
    let client = AnalysisClient::new(service.clone());
    request(&client).map_err(|e| {
        eprintln!("Could not get a prediction from the mood service:");
        eprintln!("  {e:#}");
        eprintln!();
        eprintln!("This error typically means:");
        eprintln!("  1. The inference service is not running");
        eprintln!("  2. The service address is wrong (--api-url or VIBE_API_URL)");
        eprintln!("  3. The service is still loading its models");
        eprintln!();
        eprintln!("Check the service and its docs at {}", service.docs_url());
        e
    })
}

/// Render a result and append it to the persisted history.
fn finish(
    result: &AnalysisResult,
    origin: Origin,
    title: Option<String>,
    category: Category,
) -> Result<()> {
    present::render(result, category);

    let mut ledger = HistoryLedger::open_default()?;
    ledger.record(result, origin, title);
    ledger.save().context("Failed to update history")?;
    info!("Recorded {} result in history ({})", result.mood, origin);

    Ok(())
}
