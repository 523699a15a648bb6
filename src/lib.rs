//! Mood detection & playlist suggestions from the command line.
//!
//! Core modules:
//! - [`camera`] - Webcam acquisition (V4L2)
//! - [`encoder`] - Still-frame JPEG encoding and burst capture
//! - [`client`] - Inference service client and response normalization
//! - [`present`] - Terminal rendering of results
//! - [`history`] - Persisted history of past analyses
//!
//! ### Supporting Modules
//!
//! - [`config`] - Service address and data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`model`] - Normalized result types and mood lookup tables
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use vibe::client::AnalysisClient;
//! use vibe::config::ServiceConfig;
//!
//! let client = AnalysisClient::new(ServiceConfig::default());
//! let result = client.predict_text("ready to hit the gym")?;
//! println!("{} {} ({:.0}%)", result.emoji, result.mood, result.confidence * 100.0);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! A capture flows through the modules in order: the camera session grabs
//! raw frames, the encoder turns them into JPEG stills, the client submits
//! them and normalizes whatever the service answers, the presenter renders
//! the result, and the ledger records it.
//!
//! ## Error Handling
//!
//! All fallible public functions return `Result<T, anyhow::Error>`. Nothing
//! in this crate treats a failure as fatal: camera errors leave capture
//! inactive, service errors leave the stored history untouched, and a
//! corrupt history file loads as an empty list.
//!
//! ## Logging
//!
//! Modules log through the `log` facade. The binary installs `env_logger`,
//! so `RUST_LOG=debug vibe capture` traces a whole capture cycle.

pub mod camera;
pub mod cli;
pub mod client;
pub mod completion;
pub mod config;
pub mod encoder;
pub mod history;
pub mod model;
pub mod present;
