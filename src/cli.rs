//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Vibe using Clap derive
//! macros. It provides a type-safe way to parse command-line arguments and
//! route them to appropriate functionality.
//!
//! ## Commands
//!
//! - `capture`: Grab webcam stills and get a mood prediction
//! - `analyze`: Submit image files from disk
//! - `text`: Submit free text
//! - `history`: Show or clear past results
//! - `docs`: Print the inference service documentation URL
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! vibe capture
//! vibe analyze selfie.jpg
//! vibe text "ready to hit the gym" --category workout
//! ```

use crate::config;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Playlist filter applied when rendering suggestions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Debug)]
pub enum Category {
    /// Show every suggested playlist
    All,
    /// Study and concentration playlists
    Focus,
    /// Low-key and relaxing playlists
    Chill,
    /// High-energy training playlists
    Workout,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => write!(f, "all"),
            Category::Focus => write!(f, "focus"),
            Category::Chill => write!(f, "chill"),
            Category::Workout => write!(f, "workout"),
        }
    }
}

/// Main application arguments structure.
///
/// Uses Clap derive macros to automatically generate argument parsing,
/// help text, and validation.
#[derive(Parser)]
#[command(name = "vibe")]
#[command(about = "Vibe: mood detection & playlist suggestions from your webcam, photos, or words")]
#[command(version)]
pub struct Args {
    /// Base URL of the mood inference service
    #[arg(
        long,
        global = true,
        env = "VIBE_API_URL",
        default_value = config::DEFAULT_API_URL
    )]
    pub api_url: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
///
/// Command arguments are embedded directly in the enum variants for type
/// safety and automatic validation.
#[derive(Subcommand)]
pub enum Command {
    /// Capture webcam stills and get a mood prediction
    ///
    /// Opens the camera, grabs a short burst of frames, submits them to the
    /// inference service, and renders the predicted mood with matching
    /// playlist suggestions. The camera is released as soon as the burst is
    /// done.
    Capture {
        /// Video device index (/dev/video<N>)
        #[arg(long, default_value = "0")]
        device: usize,

        /// Number of stills to capture
        ///
        /// Several frames give the classifier multiple expression samples;
        /// they are averaged server-side.
        #[arg(long, default_value = "3")]
        frames: usize,

        /// Playlist filter applied to the suggestions
        #[arg(long, value_enum, default_value_t = Category::All)]
        category: Category,
    },

    /// Analyze one or more image files from disk
    ///
    /// Submits the files as-is to the inference service. Useful for photos
    /// taken elsewhere or for machines without a webcam.
    Analyze {
        /// Image file(s) to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Playlist filter applied to the suggestions
        #[arg(long, value_enum, default_value_t = Category::All)]
        category: Category,
    },

    /// Analyze free text
    ///
    /// Sends the text to the sentiment endpoint. Empty or whitespace-only
    /// text performs no request at all.
    Text {
        /// The text to analyze
        text: String,

        /// Playlist filter applied to the suggestions
        #[arg(long, value_enum, default_value_t = Category::All)]
        category: Category,
    },

    /// Show past results
    ///
    /// The most recent analyses are kept across runs, newest first.
    History {
        /// Clear the stored history instead of showing it
        #[arg(long)]
        clear: bool,
    },

    /// Print the inference service documentation URL
    ///
    /// Reference only; no request is made.
    Docs,

    /// Generate shell completions
    ///
    /// Usage: vibe completion bash > ~/.local/share/bash-completion/completions/vibe
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
