//! Configuration sections, their defaults, and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use warpfield_starfield::{DEFAULT_HEIGHT, DEFAULT_WIDTH, PaletteSpec, SessionParams, Viewport};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    /// Star layout, motion, and generator rotation.
    pub starfield: SessionParams,
    /// Hue and luminance layout of the colour table.
    pub palette: PaletteSpec,
    pub capture: CaptureConfig,
    pub debug: DebugConfig,
}

/// Output buffer and timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// Frames rendered per second.
    pub target_fps: u32,
    /// Scheduler ticks per second, independent of the frame rate.
    pub tick_hz: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            target_fps: 70,
            tick_hz: 60,
        }
    }
}

/// Headless run length and PNG capture cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Write frames to disk.
    pub enabled: bool,
    /// Capture one frame out of every `every_n_frames`.
    pub every_n_frames: u32,
    /// Frames to render before exiting (0 = run until killed).
    pub frames: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            every_n_frames: 70,
            frames: 700,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,warpfield_starfield=trace").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
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
        std::fs::create_dir_all(config_dir).map_err(ConfigError::Write)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::Write)
    }

    /// Re-reads the file; returns `Some(new_config)` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Checks everything a session and the host loop need before starting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.target_fps == 0 {
            return Err(ConfigError::ZeroRate {
                field: "target_fps",
            });
        }
        if self.display.tick_hz == 0 {
            return Err(ConfigError::ZeroRate { field: "tick_hz" });
        }
        self.palette
            .validate()
            .map_err(warpfield_starfield::StarfieldError::from)?;
        Viewport::new(
            self.display.width,
            self.display.height,
            self.palette.luminance_count(),
        )
        .map_err(warpfield_starfield::StarfieldError::from)?;
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        ron::from_str(&contents).map_err(ConfigError::Parse)
    }
}
