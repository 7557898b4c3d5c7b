//! Configuration for the globe viewer.
//!
//! Settings persist to disk as RON, accept CLI overrides via clap, and can be
//! re-read to detect on-disk edits.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    APP_NAME, ClockConfig, Config, DebugConfig, MarkerConfig, MotionConfig, ShaderConfig,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
