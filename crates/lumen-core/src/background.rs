//! Background selection.

use serde::{Deserialize, Serialize};

/// Which animated background a screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    /// Moving nodes joined by proximity lines.
    #[default]
    Network,
    /// Trailing particles drawn with a glow.
    Particles,
}

impl BackgroundKind {
    /// Cycle to the next background.
    pub fn next(self) -> Self {
        match self {
            Self::Network => Self::Particles,
            Self::Particles => Self::Network,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Particles => "particles",
        }
    }
}
