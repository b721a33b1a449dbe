//! Command-line interface components
//!
//! This module contains CLI-specific code for the Manga Fetcher application,
//! including argument parsing, progress display, and user interaction.

pub mod args;
pub mod commands;
pub mod progress;
pub mod prompt;

pub use args::{Cli, GlobalArgs, RunArgs};
pub use commands::handle_run;
pub use progress::{format_results, ProgressConfig, ProgressDisplay};
pub use prompt::{PresetPrompt, StdinPrompt};
