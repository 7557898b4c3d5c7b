//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory name under the OS config dir.
pub const APP_NAME: &str = "terra-globe";

const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Globe rotation and camera settings.
    pub motion: MotionConfig,
    /// Simulated clock settings.
    pub clock: ClockConfig,
    /// Day/night shading settings.
    pub shader: ShaderConfig,
    /// Event marker settings.
    pub markers: MarkerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Base window title. Selection and hover text is appended at runtime.
    pub title: String,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
}

/// Globe motion configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Longitude change per frame while idle, in degrees.
    pub rotate_speed: f64,
    /// Fraction of the remaining latitude removed per idle frame, in (0, 1].
    pub return_speed: f64,
    /// Starting longitude in degrees.
    pub initial_lng: f64,
    /// Starting latitude in degrees.
    pub initial_lat: f64,
    /// Starting camera distance from the surface, in globe radii.
    pub altitude: f64,
    pub min_altitude: f64,
    pub max_altitude: f64,
    /// Degrees of rotation per pixel of drag.
    pub pan_sensitivity: f64,
    /// Fractional altitude change per wheel line.
    pub zoom_sensitivity: f64,
}

/// Simulated clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    /// Simulated milliseconds added per frame.
    pub time_step_ms: i64,
    /// Unix milliseconds to start from. `None` starts at the wall clock.
    pub start_ms: Option<i64>,
}

/// Day/night shading configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShaderConfig {
    /// Half-width of the smoothstep band around the terminator.
    pub transition_half_width: f32,
    /// Daytime equirectangular image.
    pub day_texture: Option<PathBuf>,
    /// Nighttime equirectangular image.
    pub night_texture: Option<PathBuf>,
}

/// Event marker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkerConfig {
    /// Screen distance within which a click hits a marker.
    pub pick_radius_px: f32,
    /// Column radius in globe radii.
    pub marker_radius: f32,
    /// JSON file of event records to load at startup.
    pub events_file: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Terra Globe".to_string(),
            vsync: true,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            rotate_speed: -0.1,
            return_speed: 0.02,
            initial_lng: 0.0,
            initial_lat: 30.0,
            altitude: 2.5,
            min_altitude: 0.5,
            max_altitude: 8.0,
            pan_sensitivity: 0.25,
            zoom_sensitivity: 0.1,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_step_ms: 60_000,
            start_ms: None,
        }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            transition_half_width: 0.1,
            day_texture: None,
            night_texture: None,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            pick_radius_px: 12.0,
            marker_radius: 0.008,
            events_file: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the viewer.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::debug!("Config file changed on disk");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the viewer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.motion;
        if !(m.return_speed > 0.0 && m.return_speed <= 1.0) {
            return Err(invalid(
                "motion.return_speed",
                format!("{} is outside (0, 1]", m.return_speed),
            ));
        }
        if !m.rotate_speed.is_finite() {
            return Err(invalid("motion.rotate_speed", "must be finite".into()));
        }
        if !(m.min_altitude > 0.0 && m.min_altitude <= m.max_altitude) {
            return Err(invalid(
                "motion.min_altitude",
                format!(
                    "range {}..{} is empty or not positive",
                    m.min_altitude, m.max_altitude
                ),
            ));
        }
        if self.shader.transition_half_width <= 0.0 {
            return Err(invalid(
                "shader.transition_half_width",
                format!("{} must be positive", self.shader.transition_half_width),
            ));
        }
        if self.clock.time_step_ms <= 0 {
            return Err(invalid(
                "clock.time_step_ms",
                format!("{} must be positive", self.clock.time_step_ms),
            ));
        }
        if self.markers.pick_radius_px < 0.0 {
            return Err(invalid(
                "markers.pick_radius_px",
                "must not be negative".into(),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
