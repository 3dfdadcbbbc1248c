/// Configuration: fixed animation constants plus an optional TOML file for the host.
///
/// The animation constants live in [`BackdropConfig`] and are never read from
/// disk. Every page instance gets a copy of the same value, so one place
/// governs all backgrounds.
///
/// The TOML file only covers the host binary (which pages to mount, how frames
/// are painted). No config file is required to run — defaults work out of the box.

use serde::Deserialize;
use std::time::Duration;

use crate::sink::RenderMode;
use crate::site::Page;

/// Environment variable naming an explicit config file path.
pub const CONFIG_ENV: &str = "FOLIO_BACKDROP_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "folio-backdrop.toml";

/// Animation constants shared by every backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropConfig {
    /// A descending candidate strictly below this reverses direction.
    pub reverse_below: i32,
    /// Start value on mount and value after the bottom reversal.
    pub restart_at: i32,
    /// An ascending candidate strictly above this reverses to `upper_bound - step`.
    pub upper_bound: i32,
    pub step: i32,
    pub tick_period: Duration,
    /// Hue at `restart_at`.
    pub hue_from: f64,
    /// Hue at `upper_bound`.
    pub hue_to: f64,
    /// Rotation of the second and third stop relative to the base hue.
    pub rotations: [u16; 2],
    /// (saturation %, lightness %) per stop, lightest first.
    pub stops: [(u8, u8); 3],
    /// Easing applied by the sink between successive backgrounds.
    pub transition: Duration,
}

impl BackdropConfig {
    pub const DEFAULT: BackdropConfig = BackdropConfig {
        reverse_below: 50,
        restart_at: 51,
        upper_bound: 900,
        step: 1,
        tick_period: Duration::from_millis(10),
        hue_from: 150.0, // emerald
        hue_to: 260.0,   // indigo
        rotations: [120, 240],
        stops: [(80, 70), (70, 50), (50, 15)],
        transition: Duration::from_millis(100),
    };
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Top-level host configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pages mounted at startup, in sidebar order.
    pub pages: Vec<Page>,
    /// Stop after this many milliseconds (0 = run until Ctrl-C).
    pub run_for_ms: u64,
    pub render: RenderConfig,
}

/// Render sink settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Paint every Nth tick of each page (1 = every tick).
    pub sample_every: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages: Page::ALL.to_vec(),
            run_for_ms: 0,
            render: RenderConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Ansi,
            sample_every: 100, // once per second at 10ms ticks
        }
    }
}

impl Config {
    /// Load config from the default config file path, or return defaults if not found.
    pub fn load() -> Self {
        let config_path = config_file_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::parse(&contents, &config_path),
            Err(_) => {
                log::info!("No config file found at {config_path}. Using defaults.");
                Self::default()
            }
        }
    }

    fn parse(contents: &str, origin: &str) -> Self {
        match toml::from_str::<Config>(contents) {
            Ok(mut config) => {
                if config.render.sample_every == 0 {
                    log::warn!("render.sample_every must be at least 1, using 1");
                    config.render.sample_every = 1;
                }
                log::info!("Loaded config from {origin}");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file {origin}: {e}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn run_for(&self) -> Option<Duration> {
        (self.run_for_ms > 0).then(|| Duration::from_millis(self.run_for_ms))
    }
}

fn config_file_path() -> String {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => path,
        _ => DEFAULT_CONFIG_FILE.into(),
    }
}
