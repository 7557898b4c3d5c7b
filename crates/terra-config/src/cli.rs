//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terra Globe command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "terra", about = "Day/night globe with event markers")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Daytime globe image.
    #[arg(long)]
    pub day_texture: Option<PathBuf>,

    /// Nighttime globe image.
    #[arg(long)]
    pub night_texture: Option<PathBuf>,

    /// JSON file of event records.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Simulated milliseconds per frame.
    #[arg(long)]
    pub time_step_ms: Option<i64>,

    /// Simulated start time in Unix milliseconds.
    #[arg(long)]
    pub start_ms: Option<i64>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref path) = args.day_texture {
            self.shader.day_texture = Some(path.clone());
        }
        if let Some(ref path) = args.night_texture {
            self.shader.night_texture = Some(path.clone());
        }
        if let Some(ref path) = args.events {
            self.markers.events_file = Some(path.clone());
        }
        if let Some(step) = args.time_step_ms {
            self.clock.time_step_ms = step;
        }
        if let Some(start) = args.start_ms {
            self.clock.start_ms = Some(start);
        }
    }
}
