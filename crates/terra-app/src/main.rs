//! The binary entry point for the globe viewer.

use clap::Parser;
use terra_app::{Compositor, CompositorSettings};
use terra_config::{CliArgs, Config, default_config_dir};
use terra_markers::{EventFeed, spawn_file_source};
use terra_render::TextureLoader;
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    terra_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(1);
    }

    let (feed, publisher) = EventFeed::new();
    match config.markers.events_file.clone() {
        Some(path) => {
            spawn_file_source(path, publisher);
        }
        None => info!("No events file configured, globe starts without markers"),
    }

    let textures = match (&config.shader.day_texture, &config.shader.night_texture) {
        (Some(day), Some(night)) => TextureLoader::spawn(day.clone(), night.clone()),
        _ => {
            warn!("Day/night textures not configured, rendering placeholder");
            TextureLoader::disabled()
        }
    };

    let mut compositor = Compositor::new(CompositorSettings::from_config(&config), feed, textures);
    compositor.on_selection_changed(Box::new(|record| match record {
        Some(r) => info!(id = %r.id, kind = %r.kind, "Selected {}", r.name),
        None => info!("Selection cleared"),
    }));

    if let Err(e) = terra_app::run(config, Some(config_dir), compositor) {
        error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
