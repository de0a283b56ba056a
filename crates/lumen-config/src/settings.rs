//! Configuration sections.

use lumen_core::{BackgroundKind, DisplayMode};
use serde::{Deserialize, Serialize};

const MIN_FRAME_RATE: u32 = 1;
const MAX_FRAME_RATE: u32 = 240;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub appearance: AppearanceConfig,
    pub backgrounds: BackgroundsConfig,
    pub viewport: ViewportConfig,
    pub network: NetworkConfig,
    pub particles: ParticlesConfig,
    pub forms: FormsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub mode: DisplayMode,
}

/// Which background each screen shows, and how often it redraws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundsConfig {
    pub home: BackgroundKind,
    pub login: BackgroundKind,
    pub site_setup: BackgroundKind,
    pub frame_rate: u32,
    /// Fixed seed for entity placement; random when absent.
    pub seed: Option<u64>,
}

impl Default for BackgroundsConfig {
    fn default() -> Self {
        Self {
            home: BackgroundKind::Network,
            login: BackgroundKind::Network,
            site_setup: BackgroundKind::Particles,
            frame_rate: 60,
            seed: None,
        }
    }
}

/// Size of one terminal cell in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub node_count: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { node_count: 120 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlesConfig {
    pub particle_count: usize,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            particle_count: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    pub submit_delay_ms: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Replace out-of-range values with usable ones.
    pub fn sanitized(mut self) -> Self {
        let rate = self.backgrounds.frame_rate;
        if !(MIN_FRAME_RATE..=MAX_FRAME_RATE).contains(&rate) {
            let clamped = rate.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE);
            tracing::warn!(rate, clamped, "frame_rate out of range");
            self.backgrounds.frame_rate = clamped;
        }

        let defaults = ViewportConfig::default();
        if !(self.viewport.cell_width > 0.0) {
            tracing::warn!(value = self.viewport.cell_width, "invalid cell_width");
            self.viewport.cell_width = defaults.cell_width;
        }
        if !(self.viewport.cell_height > 0.0) {
            tracing::warn!(value = self.viewport.cell_height, "invalid cell_height");
            self.viewport.cell_height = defaults.cell_height;
        }
        self
    }
}
